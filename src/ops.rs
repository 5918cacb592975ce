use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::mode::Mode;

/// Operator and punctuation symbols. `UnaryPlus` and `UnaryMinus` never come
/// out of the tokenizer: the converter creates them from `+` and `-`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `^`: power or XOR depending on the mode
    Caret,
    /// `**`
    Power,
    Ampersand,
    Pipe,
    Tilde,
    Shl,
    Shr,
    LParen,
    RParen,
    Comma,
    UnaryPlus,
    UnaryMinus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub precedence: u8,
    pub assoc: Assoc,
    pub arity: Arity,
}

impl OpInfo {
    const fn new(precedence: u8, assoc: Assoc, arity: Arity) -> Self {
        OpInfo { precedence, assoc, arity }
    }
}

const PRI_BITWISE: u8 = 1;
const PRI_ADD: u8 = 2;
const PRI_MUL: u8 = 3;
const PRI_XOR: u8 = 4;
const PRI_POWER: u8 = 5;
const PRI_NOT: u8 = 6;
const PRI_SIGN: u8 = 7;

lazy_static! {
    // `^` is stored with its XOR meaning; outside programmer mode it is
    // resolved to `**` before the table is consulted
    static ref OPERATORS: HashMap<Symbol, OpInfo> = {
        use Arity::*;
        use Assoc::*;
        let mut m = HashMap::new();
        m.insert(Symbol::Ampersand, OpInfo::new(PRI_BITWISE, Left, Binary));
        m.insert(Symbol::Pipe, OpInfo::new(PRI_BITWISE, Left, Binary));
        m.insert(Symbol::Shl, OpInfo::new(PRI_BITWISE, Left, Binary));
        m.insert(Symbol::Shr, OpInfo::new(PRI_BITWISE, Left, Binary));
        m.insert(Symbol::Plus, OpInfo::new(PRI_ADD, Left, Binary));
        m.insert(Symbol::Minus, OpInfo::new(PRI_ADD, Left, Binary));
        m.insert(Symbol::Star, OpInfo::new(PRI_MUL, Left, Binary));
        m.insert(Symbol::Slash, OpInfo::new(PRI_MUL, Left, Binary));
        m.insert(Symbol::Percent, OpInfo::new(PRI_MUL, Left, Binary));
        m.insert(Symbol::Caret, OpInfo::new(PRI_XOR, Right, Binary));
        m.insert(Symbol::Power, OpInfo::new(PRI_POWER, Right, Binary));
        m.insert(Symbol::Tilde, OpInfo::new(PRI_NOT, Right, Unary));
        m.insert(Symbol::UnaryPlus, OpInfo::new(PRI_SIGN, Right, Unary));
        m.insert(Symbol::UnaryMinus, OpInfo::new(PRI_SIGN, Right, Unary));
        m
    };
}

impl Symbol {
    /// Returns the symbol for the operator text at the start of `s`, longest
    /// match first, together with its length in bytes
    pub fn scan(s: &str) -> Option<(Symbol, usize)> {
        let two = match s.get(..2) {
            Some("**") => Some(Symbol::Power),
            Some("<<") => Some(Symbol::Shl),
            Some(">>") => Some(Symbol::Shr),
            _ => None,
        };
        if let Some(sym) = two {
            return Some((sym, 2));
        }
        let one = match s.chars().next()? {
            '+' => Symbol::Plus,
            '-' => Symbol::Minus,
            '*' => Symbol::Star,
            '/' => Symbol::Slash,
            '%' => Symbol::Percent,
            '^' => Symbol::Caret,
            '&' => Symbol::Ampersand,
            '|' => Symbol::Pipe,
            '~' => Symbol::Tilde,
            '(' => Symbol::LParen,
            ')' => Symbol::RParen,
            ',' => Symbol::Comma,
            _ => return None,
        };
        Some((one, 1))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Star => "*",
            Symbol::Slash => "/",
            Symbol::Percent => "%",
            Symbol::Caret => "^",
            Symbol::Power => "**",
            Symbol::Ampersand => "&",
            Symbol::Pipe => "|",
            Symbol::Tilde => "~",
            Symbol::Shl => "<<",
            Symbol::Shr => ">>",
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::Comma => ",",
            Symbol::UnaryPlus => "u+",
            Symbol::UnaryMinus => "u-",
        }
    }

    /// The meaning `^` takes in the given mode: XOR for programmers,
    /// exponentiation for everyone else. Other symbols are unchanged
    pub fn resolve(self, mode: Mode) -> Symbol {
        match self {
            Symbol::Caret if !mode.is_programmer() => Symbol::Power,
            _ => self,
        }
    }

    /// The unary form of a sign operator, if it has one
    pub fn to_unary(self) -> Option<Symbol> {
        match self {
            Symbol::Plus => Some(Symbol::UnaryPlus),
            Symbol::Minus => Some(Symbol::UnaryMinus),
            _ => None,
        }
    }

    /// Table entry for the symbol after mode resolution. Parentheses and the
    /// comma are not operators and have no entry
    pub fn info(self, mode: Mode) -> Option<OpInfo> {
        OPERATORS.get(&self.resolve(mode)).copied()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_longest_first() {
        assert_eq!(Symbol::scan("**2"), Some((Symbol::Power, 2)));
        assert_eq!(Symbol::scan("*2"), Some((Symbol::Star, 1)));
        assert_eq!(Symbol::scan("<<1"), Some((Symbol::Shl, 2)));
        assert_eq!(Symbol::scan(">>"), Some((Symbol::Shr, 2)));
        assert_eq!(Symbol::scan("<1"), None);
        assert_eq!(Symbol::scan(">"), None);
        assert_eq!(Symbol::scan("$"), None);
        assert_eq!(Symbol::scan(""), None);
    }

    #[test]
    fn test_caret_meaning() {
        let xor = Symbol::Caret.info(Mode::Programmer);
        assert_eq!(xor, Some(OpInfo::new(4, Assoc::Right, Arity::Binary)));
        let pow = Symbol::Caret.info(Mode::Scientific);
        assert_eq!(pow, Symbol::Power.info(Mode::Basic));
        assert_eq!(pow.map(|i| i.precedence), Some(5));
    }

    #[test]
    fn test_table() {
        let p = |s: Symbol| s.info(Mode::Basic).map(|i| i.precedence);
        assert_eq!(p(Symbol::Ampersand), Some(1));
        assert_eq!(p(Symbol::Shr), Some(1));
        assert_eq!(p(Symbol::Minus), Some(2));
        assert_eq!(p(Symbol::Percent), Some(3));
        assert_eq!(p(Symbol::Tilde), Some(6));
        assert!(p(Symbol::UnaryMinus) > p(Symbol::Tilde));
        assert_eq!(p(Symbol::LParen), None);
        assert_eq!(p(Symbol::Comma), None);
        let arity = |s: Symbol| s.info(Mode::Programmer).map(|i| i.arity);
        assert_eq!(arity(Symbol::Tilde), Some(Arity::Unary));
        assert_eq!(arity(Symbol::UnaryMinus), Some(Arity::Unary));
        assert_eq!(arity(Symbol::Minus), Some(Arity::Binary));
        assert_eq!(arity(Symbol::Caret), Some(Arity::Binary));
    }
}
