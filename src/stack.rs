use crate::errors::*;
use crate::funcs;
use crate::mode::Mode;
use crate::ops::{Arity, Assoc, OpInfo, Symbol};
use crate::parse::Token;
use crate::value::*;

/// Shunting-yard machine. While converting, `queue` holds pending operators,
/// open brackets and function names, and `output` collects the postfix
/// sequence. While calculating, `values` is the operand stack
pub(crate) struct Stack {
    mode: Mode,
    queue: Vec<Token>,
    output: Vec<Token>,
    values: Vec<Value>,
    // the previous token ended an operand: a number, a name or `)`
    is_last_value: bool,
}

impl Stack {
    pub(crate) fn new(mode: Mode) -> Self {
        Stack {
            mode,
            queue: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
            is_last_value: false,
        }
    }

    // move operators from the queue to output while the top operator binds
    // tighter than the incoming one, or equally tight for a left-associative one.
    // Stops at brackets and function names
    fn pop_while_priority(&mut self, incoming: OpInfo) {
        loop {
            let top = match self.queue.last() {
                Some(Token::Operator(sym)) => *sym,
                _ => return,
            };
            let info = match top.info(self.mode) {
                Some(info) => info,
                None => return,
            };
            let pops = info.precedence > incoming.precedence
                || (info.precedence == incoming.precedence && incoming.assoc == Assoc::Left);
            if !pops {
                return;
            }
            if let Some(e) = self.queue.pop() {
                self.output.push(e);
            }
        }
    }

    // move everything from the queue to output until the first open bracket.
    // The bracket itself is dropped unless `keep_bracket` is set
    fn pop_until_bracket(&mut self, keep_bracket: bool, err: EvalError) -> CalcErrorResult {
        loop {
            match self.queue.pop() {
                None => return Err(err),
                Some(Token::Operator(Symbol::LParen)) => {
                    if keep_bracket {
                        self.queue.push(Token::Operator(Symbol::LParen));
                    }
                    return Ok(());
                }
                Some(e) => self.output.push(e),
            }
        }
    }

    // Must be called only after the expression ends
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(e) = self.queue.pop() {
            if e.is_operator(Symbol::LParen) {
                return Err(EvalError::MismatchedParentheses);
            }
            self.output.push(e);
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, tok: Token) -> CalcErrorResult {
        match tok {
            Token::Number(..) => {
                self.output.push(tok);
                self.is_last_value = true;
            }
            Token::Identifier(..) => {
                self.queue.push(tok);
                self.is_last_value = true;
            }
            Token::Operator(Symbol::LParen) => {
                self.queue.push(tok);
                self.is_last_value = false;
            }
            Token::Operator(Symbol::RParen) => {
                self.pop_until_bracket(false, EvalError::MismatchedParentheses)?;
                if let Some(Token::Identifier(..)) = self.queue.last() {
                    if let Some(f) = self.queue.pop() {
                        self.output.push(f);
                    }
                }
                self.is_last_value = true;
            }
            Token::Operator(Symbol::Comma) => {
                self.pop_until_bracket(true, EvalError::MisplacedComma)?;
                self.is_last_value = false;
            }
            Token::Operator(sym) => {
                let sym = if self.is_last_value {
                    sym
                } else {
                    sym.to_unary().unwrap_or(sym)
                };
                let sym = sym.resolve(self.mode);
                let info = sym
                    .info(self.mode)
                    .ok_or_else(|| EvalError::UnknownToken(sym.to_string()))?;
                // a prefix operator has no left operand, nothing before it can be complete
                if info.arity == Arity::Binary {
                    self.pop_while_priority(info);
                }
                self.queue.push(Token::Operator(sym));
                self.is_last_value = false;
            }
        }
        Ok(())
    }

    pub(crate) fn into_postfix(mut self) -> Result<Vec<Token>, EvalError> {
        self.pop_all()?;
        Ok(self.output)
    }

    pub(crate) fn calculate(&mut self, postfix: &[Token]) -> CalcResult {
        self.values.clear();

        for tok in postfix {
            match tok {
                Token::Number(s) => {
                    let v = self.mode.parse_number(s)?;
                    self.values.push(v);
                }
                Token::Identifier(name) => self.process_function(name)?,
                Token::Operator(sym) => self.process_operator(*sym)?,
            }
        }

        match (self.values.pop(), self.values.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(EvalError::MalformedExpression),
        }
    }

    fn pop_operand(&mut self, name: &str) -> CalcResult {
        self.values
            .pop()
            .ok_or_else(|| EvalError::MissingOperand(name.to_string()))
    }

    fn unary<F>(&mut self, sym: Symbol, f: F) -> CalcErrorResult
    where
        F: FnOnce(Value) -> CalcResult,
    {
        let v = self.pop_operand(sym.as_str())?;
        let v = f(v)?;
        self.values.push(v);
        Ok(())
    }

    // the right operand is on top of the stack
    fn binary<F>(&mut self, sym: Symbol, f: F) -> CalcErrorResult
    where
        F: FnOnce(Value, Value) -> CalcResult,
    {
        let v2 = self.pop_operand(sym.as_str())?;
        let v1 = self.pop_operand(sym.as_str())?;
        let v = f(v1, v2)?;
        self.values.push(v);
        Ok(())
    }

    fn process_operator(&mut self, sym: Symbol) -> CalcErrorResult {
        let mode = self.mode;
        match sym.resolve(mode) {
            Symbol::UnaryPlus => self.unary(sym, Ok),
            Symbol::UnaryMinus => self.unary(sym, Value::negate),
            Symbol::Tilde => self.unary(sym, |v| v.bit_not(mode)),
            Symbol::Plus => self.binary(sym, Value::addition),
            Symbol::Minus => self.binary(sym, Value::subtract),
            Symbol::Star => self.binary(sym, Value::multiply),
            Symbol::Slash => self.binary(sym, Value::divide),
            Symbol::Percent => self.binary(sym, Value::reminder),
            Symbol::Power => self.binary(sym, Value::power),
            Symbol::Caret => self.binary(sym, |a, b| a.bit_xor(b, mode)),
            Symbol::Ampersand => self.binary(sym, |a, b| a.bit_and(b, mode)),
            Symbol::Pipe => self.binary(sym, |a, b| a.bit_or(b, mode)),
            Symbol::Shl => self.binary(sym, |a, b| a.bit_shl(b, mode)),
            Symbol::Shr => self.binary(sym, |a, b| a.bit_shr(b, mode)),
            Symbol::LParen | Symbol::RParen | Symbol::Comma => Err(EvalError::MalformedExpression),
        }
    }

    fn process_function(&mut self, name: &str) -> CalcErrorResult {
        let arg = self.pop_operand(name)?;
        let func = funcs::lookup(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
        let v = arg.apply(name, func)?;
        self.values.push(v);
        Ok(())
    }
}

/// Reorders infix tokens into postfix (reverse Polish) order.
///
/// `+` and `-` that do not follow an operand become `u+`/`u-`, and `^` is
/// resolved to XOR or `**` according to `mode`. A function name is emitted
/// right after the closing bracket of its argument
pub fn to_postfix(tokens: Vec<Token>, mode: Mode) -> Result<Vec<Token>, EvalError> {
    let mut stk = Stack::new(mode);
    for tok in tokens {
        stk.push(tok)?;
    }
    stk.into_postfix()
}

/// Runs a postfix sequence on a value stack. Exactly one value must remain
pub fn eval_postfix(postfix: &[Token], mode: Mode) -> CalcResult {
    Stack::new(mode).calculate(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    fn rpn(expr: &str, mode: Mode) -> Result<String, EvalError> {
        let tokens = tokenize(expr)?;
        let postfix = to_postfix(tokens, mode)?;
        let strs: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
        Ok(strs.join(" "))
    }

    fn calc(expr: &str, mode: Mode) -> CalcResult {
        let postfix = to_postfix(tokenize(expr)?, mode)?;
        eval_postfix(&postfix, mode)
    }

    #[test]
    fn test_simple_order() {
        assert_eq!(rpn("2 + 3 * 2 + 5", Mode::Basic), Ok("2 3 2 * + 5 +".to_string()));
        assert_eq!(calc("2 + 3 * 2 + 5", Mode::Basic), Ok(Value::Float(13.0)));
        assert_eq!(rpn("10 - 3 - 2", Mode::Basic), Ok("10 3 - 2 -".to_string()));
    }

    #[test]
    fn test_braces() {
        assert_eq!(rpn("2 + 3 * (2 + 5) + 1", Mode::Basic), Ok("2 3 2 5 + * + 1 +".to_string()));
        assert_eq!(calc("2 + 3 * (2 + 5) + 1", Mode::Programmer), Ok(Value::Int(24)));
    }

    #[test]
    fn test_power() {
        assert_eq!(rpn("2 ** 3 ** 2", Mode::Basic), Ok("2 3 2 ** **".to_string()));
        assert_eq!(rpn("2 ^ 3 ^ 2", Mode::Scientific), Ok("2 3 2 ** **".to_string()));
        assert_eq!(calc("5 + 2 ** 2 ** 3 + 1", Mode::Programmer), Ok(Value::Int(262)));
    }

    #[test]
    fn test_caret_by_mode() {
        // XOR binds looser than `**` but tighter than `*`
        assert_eq!(rpn("1 + 2 ^ 3 * 4", Mode::Programmer), Ok("1 2 3 ^ 4 * +".to_string()));
        assert_eq!(rpn("2 ^ 3 ** 2", Mode::Programmer), Ok("2 3 2 ** ^".to_string()));
        assert_eq!(rpn("2 ** 3 ^ 2", Mode::Programmer), Ok("2 3 ** 2 ^".to_string()));
        assert_eq!(rpn("2 ** 3 ^ 2", Mode::Basic), Ok("2 3 2 ** **".to_string()));
        assert_eq!(calc("2 ** 3 ^ 2", Mode::Programmer), Ok(Value::Int(10)));
    }

    #[test]
    fn test_unary() {
        assert_eq!(rpn("-3 + 5", Mode::Basic), Ok("3 u- 5 +".to_string()));
        assert_eq!(rpn("2 * -3", Mode::Basic), Ok("2 3 u- *".to_string()));
        assert_eq!(rpn("-(2 + 3)", Mode::Basic), Ok("2 3 + u-".to_string()));
        assert_eq!(rpn("(1) - 1", Mode::Basic), Ok("1 1 -".to_string()));
        assert_eq!(rpn("2 ** -1", Mode::Basic), Ok("2 1 u- **".to_string()));
        assert_eq!(rpn("-~5", Mode::Programmer), Ok("5 ~ u-".to_string()));
        assert_eq!(rpn("~5 & 3", Mode::Programmer), Ok("5 ~ 3 &".to_string()));
        assert_eq!(calc("--4", Mode::Programmer), Ok(Value::Int(4)));
        assert_eq!(calc("+4", Mode::Programmer), Ok(Value::Int(4)));
        assert_eq!(calc("-~5", Mode::Programmer), Ok(Value::Int(6)));
    }

    #[test]
    fn test_unary_binds_tightest() {
        assert_eq!(rpn("-2 ** 2", Mode::Basic), Ok("2 u- 2 **".to_string()));
        assert_eq!(calc("-2 ** 2", Mode::Basic), Ok(Value::Float(4.0)));
    }

    #[test]
    fn test_functions() {
        assert_eq!(rpn("2 + sqrt(5 - 1) * 3", Mode::Basic), Ok("2 5 1 - sqrt 3 * +".to_string()));
        assert_eq!(calc("2 + sqrt(5 - 1) * 3", Mode::Basic), Ok(Value::Float(8.0)));
        assert_eq!(rpn("abs(floor(-2.5))", Mode::Basic), Ok("2.5 u- floor abs".to_string()));
        // whitespace does not separate a name from the digits after it
        assert_eq!(rpn("sqrt 9 + 7", Mode::Basic), Ok("7 + sqrt9".to_string()));
        let v = calc("sqrt 9 + 7", Mode::Basic);
        assert_eq!(v, Err(EvalError::MissingOperand("+".to_string())));
        // a name not followed by a bracket applies to the rest of the expression
        assert_eq!(rpn("sqrt.25+.75", Mode::Basic), Ok(".25 .75 + sqrt".to_string()));
        assert_eq!(calc("sqrt.25+.75", Mode::Basic), Ok(Value::Float(1.0)));
    }

    #[test]
    fn test_comma() {
        assert_eq!(rpn("(1, 2)", Mode::Basic), Ok("1 2".to_string()));
        assert_eq!(calc("(1, 2)", Mode::Basic), Err(EvalError::MalformedExpression));
        assert_eq!(rpn("1, 2", Mode::Basic), Err(EvalError::MisplacedComma));
    }

    #[test]
    fn test_brackets_mismatch() {
        assert_eq!(rpn("(2 + 3", Mode::Basic), Err(EvalError::MismatchedParentheses));
        assert_eq!(rpn("2 + 3)", Mode::Basic), Err(EvalError::MismatchedParentheses));
        assert_eq!(rpn("((1)", Mode::Basic), Err(EvalError::MismatchedParentheses));
        assert_eq!(rpn("()", Mode::Basic), Ok(String::new()));
    }

    #[test]
    fn test_missing_operand() {
        let v = calc("2 + * 3", Mode::Basic);
        assert_eq!(v.map_err(|e| e.kind()), Err(ErrorKind::MissingOperand));
        let v = calc("sqrt()", Mode::Basic);
        assert_eq!(v, Err(EvalError::MissingOperand("sqrt".to_string())));
        let v = calc("~", Mode::Programmer);
        assert_eq!(v, Err(EvalError::MissingOperand("~".to_string())));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(calc("", Mode::Basic), Err(EvalError::MalformedExpression));
        assert_eq!(calc("1 2.5", Mode::Basic), Ok(Value::Float(12.5)));
        assert_eq!(calc("1.5.5", Mode::Basic), Err(EvalError::MalformedExpression));
        assert_eq!(calc("5 ~ 3", Mode::Programmer), Err(EvalError::MalformedExpression));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(calc("foo(1)", Mode::Basic), Err(EvalError::UnknownFunction("foo".to_string())));
        assert_eq!(calc("SIN(0)", Mode::Basic), Ok(Value::Float(0.0)));
    }

    #[test]
    fn test_raw_postfix() {
        // a caret fed directly to the evaluator still follows the mode
        let postfix = vec![
            Token::Number("6".to_string()),
            Token::Number("2".to_string()),
            Token::Operator(Symbol::Caret),
        ];
        assert_eq!(eval_postfix(&postfix, Mode::Programmer), Ok(Value::Int(4)));
        assert_eq!(eval_postfix(&postfix, Mode::Basic), Ok(Value::Float(36.0)));
        let postfix = vec![Token::Operator(Symbol::LParen)];
        assert_eq!(eval_postfix(&postfix, Mode::Basic), Err(EvalError::MalformedExpression));
    }
}
