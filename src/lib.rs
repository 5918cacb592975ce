//! # Multi-mode expression calculator
//!
//! Evaluates a one-line arithmetic, bitwise or scientific expression under
//! one of three modes. The pipeline is strictly one way:
//! string -> tokens -> postfix tokens -> number.
//!
//! Numbers are either 64-bit integers or floats. The mode decides how they
//! are produced and treated:
//! * `basic` and `scientific`: plain decimal literals like `42` are floats,
//!   `^` is exponentiation
//! * `programmer`: plain decimal literals are integers, `^` is bitwise XOR,
//!   whole floats are accepted by bitwise operators and a whole float result
//!   is returned as an integer
//!
//! Literals prefixed with `0b`, `0o` or `0x` are integers in every mode.
//! Bitwise operators refuse anything that is not an integer, so `0xFF & 0x0F`
//! works in any mode while `2 & 3` needs programmer mode.
//!
//! Operators (starting from highest priority):
//! * `-`, `+` - unary sign
//! * `~` - bitwise NOT
//! * `**` - power (and `^` outside programmer mode)
//! * `^` - bitwise XOR (programmer mode)
//! * `*`, `/`, `%` - multiplication, division (always a float), floored remainder
//! * `+`, `-` - addition, subtraction
//! * `&`, `|`, `<<`, `>>` - bitwise AND, OR, SHL and SHR
//!
//! Power, XOR and the unary operators group right to left, everything else
//! left to right: `10 - 3 - 2` is `5`, `2 ** 3 ** 2` is `512`.
//!
//! The list of supported functions (one argument, result is always a float):
//! * trigonometric functions: sin, cos, tan, asin, acos, atan
//! * logarithms and exponent: log (base 10), ln, exp
//! * sqrt, abs, floor, ceil
//!
//! Function names are case-insensitive. Whitespace is removed before
//! scanning, so a name must be separated from its argument by a bracket:
//! `sqrt 9` is read as the single name `sqrt9`.
//!
//! ```
//! use kalc::{evaluate, Mode, Value};
//!
//! assert_eq!(evaluate("0xFF & 0x0F", Mode::Programmer), Ok(Value::Int(15)));
//! assert_eq!(evaluate("2 ^ 3", Mode::Programmer), Ok(Value::Int(1)));
//! assert_eq!(evaluate("2 ^ 3", Mode::Scientific), Ok(Value::Float(8.0)));
//! assert!(evaluate("(2 + 3", Mode::Basic).is_err());
//! ```

use tracing::trace;

pub mod errors;
pub mod funcs;
pub mod mode;
pub mod ops;
pub mod parse;
pub mod stack;
pub mod value;

pub use errors::{ErrorKind, EvalError};
pub use funcs::{function_names, is_function};
pub use mode::Mode;
pub use parse::{tokenize, Token};
pub use stack::{eval_postfix, to_postfix};
pub use value::{CalcResult, Value};

/// Evaluates an expression and returns either result or error
pub fn evaluate(expr: &str, mode: Mode) -> CalcResult {
    let tokens = tokenize(expr)?;
    trace!(%mode, ?tokens, "tokenized");
    let postfix = to_postfix(tokens, mode)?;
    trace!(%mode, ?postfix, "converted to postfix");
    let v = eval_postfix(&postfix, mode)?;
    Ok(mode.normalize(v))
}

/// Same as [`evaluate`] with the mode given by name:
/// `basic`, `scientific` or `programmer`
pub fn evaluate_str(expr: &str, mode: &str) -> CalcResult {
    let mode: Mode = mode.parse()?;
    evaluate(expr, mode)
}
