//! Postfix expression evaluator
//!
//! Expressions look like `@{ A 10 + }`: whitespace separated tokens in
//! reverse Polish order, evaluated over an `i64` operand stack. Tokens are
//! classified in priority order as operator, integer literal, then constant
//! name. Every operator is binary; the operand pushed first is the left one.

use crate::domain::model::{ConstantTable, EXPRESSION_PREFIX, EXPRESSION_SUFFIX};
use crate::utils::error::{Result, TransitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Max,
    Mod,
}

impl Operator {
    /// Recognizes operator-shaped tokens. Anything starting with `max(` or
    /// `mod(` is claimed as an operator here; whether it closes with `)` is
    /// checked when it is applied, after its operands are on hand.
    pub fn classify(token: &str) -> Option<Operator> {
        match token {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            _ if token.starts_with("max(") => Some(Operator::Max),
            _ if token.starts_with("mod(") => Some(Operator::Mod),
            _ => None,
        }
    }

    fn is_parameterized(self) -> bool {
        matches!(self, Operator::Max | Operator::Mod)
    }

    /// Applies the operator to `a` (earlier operand) and `b` (later operand).
    /// `token` is only used for error messages.
    pub fn apply(self, a: i64, b: i64, token: &str) -> Result<i64> {
        if self.is_parameterized() && !token.ends_with(')') {
            return Err(TransitError::UnknownOperator {
                operator: token.to_string(),
            });
        }
        let overflow = || TransitError::ArithmeticOverflow {
            operator: token.to_string(),
        };
        match self {
            Operator::Add => a.checked_add(b).ok_or_else(overflow),
            Operator::Sub => a.checked_sub(b).ok_or_else(overflow),
            Operator::Mul => a.checked_mul(b).ok_or_else(overflow),
            Operator::Max => Ok(a.max(b)),
            Operator::Mod => floored_mod(a, b, token),
        }
    }
}

/// Floored modulo: the result takes the sign of the divisor.
fn floored_mod(a: i64, b: i64, token: &str) -> Result<i64> {
    if b == 0 {
        return Err(TransitError::DivisionByZero {
            operator: token.to_string(),
        });
    }
    // i64::MIN % -1 overflows in the hardware remainder; the answer is 0.
    let rem = a.checked_rem(b).unwrap_or(0);
    if rem != 0 && (rem < 0) != (b < 0) {
        Ok(rem + b)
    } else {
        Ok(rem)
    }
}

/// Whether `text` has the shape of an integer literal: ASCII digits with an
/// optional single leading `-`.
pub fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a literal-shaped token; `Ok(None)` for anything else.
fn parse_literal(token: &str) -> Result<Option<i64>> {
    if !is_integer_literal(token) {
        return Ok(None);
    }
    token
        .parse::<i64>()
        .map(Some)
        .map_err(|_| TransitError::IntegerOutOfRange {
            token: token.to_string(),
        })
}

fn resolve_operand(token: &str, constants: &ConstantTable) -> Result<i64> {
    if let Some(value) = parse_literal(token)? {
        return Ok(value);
    }

    let Some(raw) = constants.get(token) else {
        return Err(TransitError::UnresolvableToken {
            token: token.to_string(),
        });
    };

    if !is_integer_literal(raw) {
        return Err(TransitError::NonNumericConstant {
            name: token.to_string(),
            value: raw.to_string(),
        });
    }
    raw.parse::<i64>().map_err(|_| TransitError::IntegerOutOfRange {
        token: raw.to_string(),
    })
}

pub fn is_expression(text: &str) -> bool {
    text.starts_with(EXPRESSION_PREFIX)
}

/// Returns the token body between `@{` and `}`.
fn expression_body(expression: &str) -> Result<&str> {
    let trimmed = expression.trim();
    let inner = trimmed.strip_prefix(EXPRESSION_PREFIX).unwrap_or(trimmed);
    inner
        .strip_suffix(EXPRESSION_SUFFIX)
        .ok_or_else(|| TransitError::UnterminatedExpression {
            expression: trimmed.to_string(),
        })
}

/// Evaluates a marker-wrapped postfix expression against `constants`.
pub fn evaluate_expression(expression: &str, constants: &ConstantTable) -> Result<i64> {
    let body = expression_body(expression)?;
    let mut stack: Vec<i64> = Vec::new();

    for token in body.split_whitespace() {
        match Operator::classify(token) {
            Some(op) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(TransitError::StackUnderflow {
                        operator: token.to_string(),
                    });
                };
                stack.push(op.apply(a, b, token)?);
            }
            None => stack.push(resolve_operand(token, constants)?),
        }
    }

    match stack.as_slice() {
        [value] => {
            tracing::debug!("Evaluated '{}' to {}", expression.trim(), value);
            Ok(*value)
        }
        _ => Err(TransitError::MalformedExpressionResult {
            expression: expression.trim().to_string(),
            remaining: stack.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants(pairs: &[(&str, &str)]) -> ConstantTable {
        pairs.iter().copied().collect()
    }

    fn eval(expression: &str) -> Result<i64> {
        evaluate_expression(expression, &ConstantTable::new())
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(eval("@{ 10 20 + }").unwrap(), 30);
        assert_eq!(eval("@{ 20 5 * }").unwrap(), 100);
        assert_eq!(eval("@{ 3 10 - }").unwrap(), -7);
        assert_eq!(eval("@{ 2 3 4 * + }").unwrap(), 14);
        assert_eq!(eval("@{ 2 3 + 4 * }").unwrap(), 20);
    }

    #[test]
    fn test_constants_are_substituted() {
        let table = constants(&[("CONST_ONE", "10"), ("CONST_TWO", "20")]);
        assert_eq!(evaluate_expression("@{ CONST_ONE CONST_TWO + }", &table).unwrap(), 30);
        assert_eq!(evaluate_expression("@{ CONST_TWO 5 * }", &table).unwrap(), 100);

        let negative = constants(&[("N", "-4")]);
        assert_eq!(evaluate_expression("@{ N 1 - }", &negative).unwrap(), -5);
    }

    #[test]
    fn test_negative_literals() {
        assert_eq!(eval("@{ -5 2 + }").unwrap(), -3);
        assert_eq!(eval("@{ -5 -5 * }").unwrap(), 25);
    }

    #[test]
    fn test_max_operator() {
        assert_eq!(eval("@{ 3 9 max() }").unwrap(), 9);
        assert_eq!(eval("@{ -3 -9 max() }").unwrap(), -3);
        assert_eq!(eval("@{ 1 2 max(a,b) }").unwrap(), 2);
    }

    #[test]
    fn test_mod_floored_for_all_sign_combinations() {
        assert_eq!(eval("@{ 7 3 mod() }").unwrap(), 1);
        assert_eq!(eval("@{ -7 3 mod() }").unwrap(), 2);
        assert_eq!(eval("@{ 7 -3 mod() }").unwrap(), -2);
        assert_eq!(eval("@{ -7 -3 mod() }").unwrap(), -1);
        assert_eq!(eval("@{ 6 3 mod() }").unwrap(), 0);
        assert_eq!(eval("@{ -6 3 mod() }").unwrap(), 0);
    }

    #[test]
    fn test_mod_by_zero() {
        let err = eval("@{ 7 0 mod() }").unwrap_err();
        assert!(matches!(err, TransitError::DivisionByZero { ref operator } if operator == "mod()"));
    }

    #[test]
    fn test_unknown_token_names_token() {
        let table = constants(&[("A", "1")]);
        let err = evaluate_expression("@{ B 10 + }", &table).unwrap_err();
        assert!(matches!(err, TransitError::UnresolvableToken { ref token } if token == "B"));
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn test_non_numeric_constant_names_constant() {
        let table = constants(&[("A", "abc")]);
        let err = evaluate_expression("@{ A 10 + }", &table).unwrap_err();
        assert!(matches!(err, TransitError::NonNumericConstant { ref name, .. } if name == "A"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_plus_sign_is_not_a_literal() {
        let err = eval("@{ +5 1 + }").unwrap_err();
        assert!(matches!(err, TransitError::UnresolvableToken { ref token } if token == "+5"));
    }

    #[test]
    fn test_stack_underflow() {
        let err = eval("@{ 1 + }").unwrap_err();
        assert!(matches!(err, TransitError::StackUnderflow { ref operator } if operator == "+"));
        assert!(matches!(eval("@{ max() }"), Err(TransitError::StackUnderflow { .. })));
    }

    #[test]
    fn test_result_must_be_single_value() {
        assert!(matches!(
            eval("@{ 1 2 }"),
            Err(TransitError::MalformedExpressionResult { remaining: 2, .. })
        ));
        assert!(matches!(
            eval("@{ }"),
            Err(TransitError::MalformedExpressionResult { remaining: 0, .. })
        ));
    }

    #[test]
    fn test_unclosed_parameterized_operator_is_unknown() {
        let err = eval("@{ 1 2 max( }").unwrap_err();
        assert!(matches!(err, TransitError::UnknownOperator { ref operator } if operator == "max("));
    }

    #[test]
    fn test_operand_check_precedes_operator_shape_check() {
        assert!(matches!(
            eval("@{ max( }"),
            Err(TransitError::StackUnderflow { ref operator }) if operator == "max("
        ));
        assert!(matches!(
            eval("@{ 4 mod(x }"),
            Err(TransitError::StackUnderflow { ref operator }) if operator == "mod(x"
        ));
    }

    #[test]
    fn test_operator_wins_over_constant_lookup() {
        let table = constants(&[("-", "5")]);
        assert_eq!(evaluate_expression("@{ 9 4 - }", &table).unwrap(), 5);
    }

    #[test]
    fn test_missing_closing_marker() {
        assert!(matches!(
            eval("@{ 1 2 +"),
            Err(TransitError::UnterminatedExpression { .. })
        ));
    }

    #[test]
    fn test_marker_without_spaces() {
        assert_eq!(eval("@{1 2 +}").unwrap(), 3);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            eval("@{ 9223372036854775807 1 + }"),
            Err(TransitError::ArithmeticOverflow { .. })
        ));
        assert!(matches!(
            eval("@{ 99999999999999999999 }"),
            Err(TransitError::IntegerOutOfRange { .. })
        ));
        assert_eq!(eval("@{ -9223372036854775808 -1 mod() }").unwrap(), 0);
    }

    #[test]
    fn test_is_integer_literal() {
        assert!(is_integer_literal("0"));
        assert!(is_integer_literal("-12"));
        assert!(!is_integer_literal("-"));
        assert!(!is_integer_literal(""));
        assert!(!is_integer_literal("--1"));
        assert!(!is_integer_literal("1.5"));
        assert!(!is_integer_literal("١٢"));
    }
}
