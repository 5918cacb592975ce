use std::fmt;
use std::str::FromStr;

use num_traits::FromPrimitive;

use crate::errors::EvalError;
use crate::value::{CalcResult, Value};

/// Evaluation dialect. It decides how bare decimal literals are typed, what
/// `^` means, and whether whole floats are turned back into integers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Basic,
    Scientific,
    Programmer,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Basic, Mode::Scientific, Mode::Programmer];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Basic => "basic",
            Mode::Scientific => "scientific",
            Mode::Programmer => "programmer",
        }
    }

    pub fn is_programmer(self) -> bool {
        self == Mode::Programmer
    }

    /// Converts a numeric literal produced by the tokenizer into a value.
    /// Prefixed literals (`0b`, `0o`, `0x`) are always integers; a plain run
    /// of decimal digits is an integer only in programmer mode
    pub fn parse_number(self, s: &str) -> CalcResult {
        let radix = match s.get(..2) {
            Some("0b") | Some("0B") => Some(2),
            Some("0o") | Some("0O") => Some(8),
            Some("0x") | Some("0X") => Some(16),
            _ => None,
        };
        if let Some(radix) = radix {
            return match i64::from_str_radix(&s[2..], radix) {
                Ok(i) => Ok(Value::Int(i)),
                Err(..) => Err(EvalError::InvalidNumber(s.to_owned())),
            };
        }

        if self.is_programmer() && s.bytes().all(|b| b.is_ascii_digit()) {
            return match s.parse::<i64>() {
                Ok(i) => Ok(Value::Int(i)),
                Err(..) => Err(EvalError::InvalidNumber(s.to_owned())),
            };
        }

        match s.parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(..) => Err(EvalError::InvalidNumber(s.to_owned())),
        }
    }

    /// Integer view of an operand of a bitwise operator `op`. Floats qualify
    /// only in programmer mode and only when they have no fractional part
    pub fn coerce_int(self, v: &Value, op: &str) -> Result<i64, EvalError> {
        match v {
            Value::Int(i) => Ok(*i),
            Value::Float(f) if self.is_programmer() && f.fract() == 0.0 => {
                i64::from_f64(*f).ok_or_else(|| EvalError::BitwiseTypeError(op.to_owned()))
            }
            Value::Float(..) => Err(EvalError::BitwiseTypeError(op.to_owned())),
        }
    }

    /// Final shaping of an evaluation result
    pub fn normalize(self, v: Value) -> Value {
        match v {
            Value::Float(f) if self.is_programmer() && f.fract() == 0.0 => match i64::from_f64(f) {
                Some(i) => Value::Int(i),
                None => v,
            },
            _ => v,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let low = s.trim().to_lowercase();
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.name() == low)
            .ok_or_else(|| EvalError::UnknownMode(s.to_owned()))
    }
}
