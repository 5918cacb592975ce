use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kalc::{evaluate, function_names, Mode};

/// kalc is a multi-mode calculator: basic arithmetic, scientific functions
/// and programmer-style integer and bitwise math.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluation mode: basic, scientific or programmer
    #[arg(short, long, env = "KALC_MODE", default_value = "basic")]
    mode: Mode,

    /// Evaluate one expression, print the result and exit
    #[arg(short, long)]
    expr: Option<String>,

    /// Print the token and postfix streams of every evaluation
    #[arg(short, long)]
    verbose: bool,
}

fn print_help() {
    println!();
    println!("COMMANDS:");
    println!("  .mode <basic|scientific|programmer>  set evaluation mode");
    println!("  .help                                show this help message");
    println!("  .exit, .quit                         exit the calculator");
    println!();
    println!("EXAMPLES:");
    println!("  basic:       2 + 2, 10 * 5 - 3");
    println!("  scientific:  sin(3.14159/2), 2 ^ 8 (power)");
    println!("  programmer:  0xFF & 0b1010, 15 << 2, 5 ^ 2 (xor)");
    println!();
    println!("FUNCTIONS:");
    println!("  {}", function_names().join(", "));
    println!();
    println!("OPERATORS:");
    println!("  arithmetic: + - * / %");
    println!("  power:      ** (and ^ outside programmer mode)");
    println!("  bitwise:    & | ~ << >> (^ is xor in programmer mode)");
    println!();
}

// returns false when the session must end
fn process_command(line: &str, mode: &mut Mode) -> bool {
    let mut parts = line[1..].split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "exit" | "quit" => return false,
        "help" => print_help(),
        "mode" => match parts.next().map(str::parse::<Mode>) {
            Some(Ok(m)) => {
                debug!(from = %mode, to = %m, "mode changed");
                *mode = m;
                println!("mode -> {}", mode);
            }
            _ => println!("Usage: .mode <basic|scientific|programmer>"),
        },
        _ => println!("Unknown command: {} (type .help)", line),
    }
    true
}

fn repl(mut mode: Mode) -> io::Result<()> {
    println!("kalc - multi-mode calculator");
    println!("Type expressions to evaluate. Commands start with a dot: .help");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", mode);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                return Ok(());
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('.') {
            if !process_command(line, &mut mode) {
                return Ok(());
            }
            continue;
        }
        match evaluate(line, mode) {
            Ok(v) => println!("{}", v),
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("kalc=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    if let Some(expr) = args.expr {
        match evaluate(&expr, args.mode) {
            Ok(v) => println!("{}", v),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = repl(args.mode) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
