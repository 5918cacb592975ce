use num_traits::ToPrimitive;
use std::fmt;
use std::str;

use crate::errors::*;
use crate::mode::Mode;

/// Expression calculation result: either value or error
pub type CalcResult = Result<Value, EvalError>;
pub(crate) type CalcErrorResult = Result<(), EvalError>;

/// A number produced by evaluation. Integer and float operands mix freely in
/// arithmetic; bitwise operators need both sides to be integers
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// Float number
    Float(f64),
}

const F64_BUF_LEN: usize = 48;
fn format_f64(g: f64) -> String {
    if !g.is_finite() {
        return format!("{}", g);
    }
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(g) => write!(f, "{}", format_f64(*g)),
        }
    }
}

// floored remainder: the result has the sign of the divisor
fn floor_rem_int(a: i64, b: i64) -> i64 {
    match a.checked_rem(b) {
        Some(r) if r != 0 && (r < 0) != (b < 0) => r + b,
        Some(r) => r,
        // i64::MIN % -1
        None => 0,
    }
}

fn floor_rem_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

// integer arithmetic that does not fit into i64 continues in floats
macro_rules! basic_op {
    ($id:ident, $checked:ident, $op:tt) => {
        pub fn $id(self, rhs: Value) -> CalcResult {
            match (self, rhs) {
                (Value::Int(i1), Value::Int(i2)) => match i1.$checked(i2) {
                    Some(i) => Ok(Value::Int(i)),
                    None => Ok(Value::Float(i1 as f64 $op i2 as f64)),
                },
                _ => Ok(Value::Float(self.into_raw_f64() $op rhs.into_raw_f64())),
            }
        }
    };
}

macro_rules! bitwise_op {
    ($id:ident, $op:tt, $sym:expr) => {
        pub fn $id(self, rhs: Value, mode: Mode) -> CalcResult {
            let i1 = mode.coerce_int(&self, $sym)?;
            let i2 = mode.coerce_int(&rhs, $sym)?;
            Ok(Value::Int(i1 $op i2))
        }
    };
}

impl Value {
    pub(crate) fn into_raw_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    /// Numeric view of the value regardless of its representation
    pub fn as_f64(&self) -> f64 {
        self.into_raw_f64()
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(..))
    }

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Value::Int(i) => *i < 0,
            Value::Float(f) => *f < 0.0,
        }
    }

    basic_op!(addition, checked_add, +);
    basic_op!(subtract, checked_sub, -);
    basic_op!(multiply, checked_mul, *);

    /// True division: the quotient is a float even for two integers
    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero(format!("{}", self)));
        }
        Ok(Value::Float(self.into_raw_f64() / rhs.into_raw_f64()))
    }

    pub fn reminder(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero(format!("{}", self)));
        }
        match (self, rhs) {
            (Value::Int(i1), Value::Int(i2)) => Ok(Value::Int(floor_rem_int(i1, i2))),
            _ => Ok(Value::Float(floor_rem_f64(self.into_raw_f64(), rhs.into_raw_f64()))),
        }
    }

    pub fn power(self, rhs: Value) -> CalcResult {
        if self.is_zero() && rhs.is_negative() {
            return Err(EvalError::DivisionByZero(format!("{}", self)));
        }
        if let (Value::Int(base), Value::Int(exp)) = (self, rhs) {
            if let Some(i) = exp.to_u32().and_then(|e| base.checked_pow(e)) {
                return Ok(Value::Int(i));
            }
        }
        Ok(Value::Float(self.into_raw_f64().powf(rhs.into_raw_f64())))
    }

    /// Inverts the sign of the value
    pub fn negate(self) -> CalcResult {
        match self {
            Value::Int(i) => match i.checked_neg() {
                Some(n) => Ok(Value::Int(n)),
                None => Ok(Value::Float(-(i as f64))),
            },
            Value::Float(f) => Ok(Value::Float(-f)),
        }
    }

    bitwise_op!(bit_and, &, "&");
    bitwise_op!(bit_or, |, "|");
    bitwise_op!(bit_xor, ^, "^");

    pub fn bit_shl(self, rhs: Value, mode: Mode) -> CalcResult {
        let i1 = mode.coerce_int(&self, "<<")?;
        let i2 = mode.coerce_int(&rhs, "<<")?;
        if i2 < 0 {
            return Err(EvalError::InvalidShift(format!("{}", i2)));
        }
        if i1 == 0 {
            return Ok(Value::Int(0));
        }
        // a shift is valid only when shifting back restores the operand
        match i2.to_u32().and_then(|s| i1.checked_shl(s)) {
            Some(r) if r >> i2 == i1 => Ok(Value::Int(r)),
            _ => Err(EvalError::InvalidShift(format!("{} << {}", i1, i2))),
        }
    }

    pub fn bit_shr(self, rhs: Value, mode: Mode) -> CalcResult {
        let i1 = mode.coerce_int(&self, ">>")?;
        let i2 = mode.coerce_int(&rhs, ">>")?;
        if i2 < 0 {
            return Err(EvalError::InvalidShift(format!("{}", i2)));
        }
        Ok(Value::Int(i1 >> i2.min(63)))
    }

    pub fn bit_not(self, mode: Mode) -> CalcResult {
        let i = mode.coerce_int(&self, "~")?;
        Ok(Value::Int(!i))
    }

    /// Applies a registry function to the float view of the value. A finite
    /// argument that produces NaN or an infinity is a domain error
    pub fn apply(self, name: &str, func: fn(f64) -> f64) -> CalcResult {
        let arg = self.into_raw_f64();
        let res = func(arg);
        if arg.is_finite() && !res.is_finite() {
            return Err(EvalError::MathDomain(format!("{}({})", name, self)));
        }
        Ok(Value::Float(res))
    }
}
