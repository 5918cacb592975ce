use thiserror::Error;

/// Category of an evaluation failure, independent of the offending text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownToken,
    MismatchedParentheses,
    MissingOperand,
    UnknownFunction,
    BitwiseTypeError,
    MalformedExpression,
    DivisionByZero,
    InvalidShift,
    InvalidNumber,
    MathDomain,
    UnknownMode,
}

/// Any failure while tokenizing, converting or evaluating an expression.
/// Evaluation is all-or-nothing: the first error aborts the whole call.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("Unknown token starting at: '{0}'")]
    UnknownToken(String),
    #[error("Mismatched parentheses")]
    MismatchedParentheses,
    #[error("Mismatched parentheses or misplaced comma")]
    MisplacedComma,
    #[error("'{0}' is missing an operand")]
    MissingOperand(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Bitwise operator '{0}' requires integer operands")]
    BitwiseTypeError(String),
    #[error("Malformed expression")]
    MalformedExpression,
    #[error("'{0}' divided by zero")]
    DivisionByZero(String),
    #[error("Invalid shift count {0}")]
    InvalidShift(String),
    #[error("Failed to convert '{0}' to a number")]
    InvalidNumber(String),
    #[error("Math domain error in '{0}'")]
    MathDomain(String),
    #[error("Unknown mode '{0}', expected basic, scientific or programmer")]
    UnknownMode(String),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::UnknownToken(..) => ErrorKind::UnknownToken,
            EvalError::MismatchedParentheses | EvalError::MisplacedComma => ErrorKind::MismatchedParentheses,
            EvalError::MissingOperand(..) => ErrorKind::MissingOperand,
            EvalError::UnknownFunction(..) => ErrorKind::UnknownFunction,
            EvalError::BitwiseTypeError(..) => ErrorKind::BitwiseTypeError,
            EvalError::MalformedExpression => ErrorKind::MalformedExpression,
            EvalError::DivisionByZero(..) => ErrorKind::DivisionByZero,
            EvalError::InvalidShift(..) => ErrorKind::InvalidShift,
            EvalError::InvalidNumber(..) => ErrorKind::InvalidNumber,
            EvalError::MathDomain(..) => ErrorKind::MathDomain,
            EvalError::UnknownMode(..) => ErrorKind::UnknownMode,
        }
    }
}
