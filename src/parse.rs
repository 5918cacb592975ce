use std::fmt;

use crate::errors::*;
use crate::ops::Symbol;

/// A lexical unit of an expression. Numbers keep their source text: how a
/// literal is typed depends on the mode and is decided at evaluation
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(String),
    Identifier(String),
    Operator(Symbol),
}

impl Token {
    pub fn is_operator(&self, sym: Symbol) -> bool {
        matches!(self, Token::Operator(s) if *s == sym)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(s) | Token::Identifier(s) => write!(f, "{}", s),
            Token::Operator(sym) => write!(f, "{}", sym),
        }
    }
}

fn count_while(b: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    b.iter().take_while(|c| pred(**c)).count()
}

// `0b1010`, `0o17`, `0xFF`: the prefix must be followed by at least one digit
fn scan_prefixed(b: &[u8], marker: u8, is_digit: fn(u8) -> bool) -> Option<usize> {
    if b.len() > 2 && b[0] == b'0' && b[1].to_ascii_lowercase() == marker && is_digit(b[2]) {
        Some(2 + count_while(&b[2..], is_digit))
    } else {
        None
    }
}

// digits, optional fraction, optional exponent: `12`, `1.5`, `.5`, `2e-3`.
// A dot without digits after it is not part of the literal
fn scan_decimal(b: &[u8]) -> Option<usize> {
    let int = count_while(b, |c| c.is_ascii_digit());
    let mut len = int;
    if b.get(int) == Some(&b'.') {
        let frac = count_while(&b[int + 1..], |c| c.is_ascii_digit());
        if frac > 0 {
            len = int + 1 + frac;
        }
    }
    if len == 0 {
        return None;
    }

    if matches!(b.get(len), Some(b'e') | Some(b'E')) {
        let mut exp = len + 1;
        if matches!(b.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let digits = b.get(exp..).map_or(0, |rest| count_while(rest, |c| c.is_ascii_digit()));
        if digits > 0 {
            len = exp + digits;
        }
    }
    Some(len)
}

/// Length of the numeric literal at the start of `s`, if any
pub(crate) fn scan_number(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    scan_prefixed(b, b'b', |c| c == b'0' || c == b'1')
        .or_else(|| scan_prefixed(b, b'o', |c| (b'0'..=b'7').contains(&c)))
        .or_else(|| scan_prefixed(b, b'x', |c| c.is_ascii_hexdigit()))
        .or_else(|| scan_decimal(b))
}

/// Length of the identifier at the start of `s`, if any
pub(crate) fn scan_identifier(s: &str) -> Option<usize> {
    let b = s.as_bytes();
    match b.first() {
        Some(c) if c.is_ascii_alphabetic() || *c == b'_' => {
            Some(1 + count_while(&b[1..], |c| c.is_ascii_alphanumeric() || c == b'_'))
        }
        _ => None,
    }
}

/// Splits an expression into tokens. Whitespace is insignificant and removed
/// before scanning, so `1 2` is the single number `12`.
///
/// Operators are tried first (two-character ones before single ones), then
/// numeric literals, then identifiers. Identifiers are not checked against
/// the function list here
pub fn tokenize(expr: &str) -> Result<Vec<Token>, EvalError> {
    let s: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < s.len() {
        let rest = &s[pos..];
        if let Some((sym, len)) = Symbol::scan(rest) {
            tokens.push(Token::Operator(sym));
            pos += len;
        } else if let Some(len) = scan_number(rest) {
            tokens.push(Token::Number(rest[..len].to_string()));
            pos += len;
        } else if let Some(len) = scan_identifier(rest) {
            tokens.push(Token::Identifier(rest[..len].to_string()));
            pos += len;
        } else {
            return Err(EvalError::UnknownToken(rest.to_string()));
        }
    }
    Ok(tokens)
}
