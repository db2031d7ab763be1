//! Integer arithmetic expressions
//!
//! Expression trees of constants, variables and the four arithmetic
//! operators, parsed from a token stream by precedence climbing and
//! evaluated against a `VariableTable`.

use crate::error::{BasicError, Result};
use crate::tokenizer::{Scanner, Token};
use crate::variables::VariableTable;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    fn from_char(op: char) -> Option<BinaryOperator> {
        match op {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    /// Higher number binds tighter
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Multiply | BinaryOperator::Divide => 50,
            BinaryOperator::Add | BinaryOperator::Subtract => 40,
        }
    }

    /// Operator character as written in source
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

/// Integer expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal
    Constant(i32),
    /// Variable reference
    Identifier(String),
    /// Binary operation
    Compound {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn compound(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Compound {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluate the expression against the variable table
    pub fn evaluate(&self, variables: &VariableTable) -> Result<i32> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Identifier(name) => variables.get(name),
            Expression::Compound { op, left, right } => {
                let left_val = left.evaluate(variables)?;
                let right_val = right.evaluate(variables)?;

                match op {
                    BinaryOperator::Add => Ok(left_val.wrapping_add(right_val)),
                    BinaryOperator::Subtract => Ok(left_val.wrapping_sub(right_val)),
                    BinaryOperator::Multiply => Ok(left_val.wrapping_mul(right_val)),
                    BinaryOperator::Divide => {
                        if right_val == 0 {
                            Err(BasicError::DivisionByZero)
                        } else {
                            Ok(left_val.wrapping_div(right_val))
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Identifier(name) => f.write_str(name),
            Expression::Compound { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

// Deepest nesting accepted in one expression, counting both parentheses
// and operator trees
const MAX_DEPTH: usize = 256;

/// Parse an expression from the scanner.
///
/// Stops at the first token that cannot continue the expression and pushes
/// it back, leaving the caller to decide whether it is valid there.
pub fn parse_expression(scanner: &mut Scanner) -> Result<Expression> {
    parse_expr_precedence(scanner, 0, 0).map(|(expr, _)| expr)
}

fn too_deep() -> BasicError {
    BasicError::syntax("Expression too deeply nested")
}

/// Parse expression with precedence climbing algorithm.
///
/// Returns the expression together with the height of its tree.
fn parse_expr_precedence(
    scanner: &mut Scanner,
    min_prec: u8,
    depth: usize,
) -> Result<(Expression, usize)> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    let (mut left, mut height) = parse_primary(scanner, depth + 1)?;

    while let Some(token) = scanner.next_token()? {
        let op = match &token {
            Token::Operator(ch) => BinaryOperator::from_char(*ch),
            _ => None,
        };

        let op = match op {
            Some(op) if op.precedence() >= min_prec => op,
            _ => {
                scanner.save_token(token);
                break;
            }
        };

        // Left-associative: the right operand only takes tighter operators
        let (right, right_height) =
            parse_expr_precedence(scanner, op.precedence() + 1, depth + 1)?;
        height = height.max(right_height) + 1;
        if height > MAX_DEPTH {
            return Err(too_deep());
        }
        left = Expression::compound(op, left, right);
    }

    Ok((left, height))
}

/// Parse a primary expression (literal, variable, unary sign or parenthesized expression)
fn parse_primary(scanner: &mut Scanner, depth: usize) -> Result<(Expression, usize)> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    let token = scanner
        .next_token()?
        .ok_or_else(|| BasicError::syntax("Unexpected end of expression"))?;

    match token {
        Token::Number(value) => Ok((Expression::Constant(value), 0)),
        Token::Identifier(name) => Ok((Expression::Identifier(name), 0)),

        Token::Operator('-') => {
            let (operand, height) = parse_primary(scanner, depth + 1)?;
            Ok(match operand {
                Expression::Constant(value) => (Expression::Constant(value.wrapping_neg()), 0),
                operand => (
                    Expression::compound(
                        BinaryOperator::Subtract,
                        Expression::Constant(0),
                        operand,
                    ),
                    height + 1,
                ),
            })
        }
        Token::Operator('+') => parse_primary(scanner, depth + 1),

        Token::Separator('(') => {
            let parsed = parse_expr_precedence(scanner, 0, depth + 1)?;
            match scanner.next_token()? {
                Some(Token::Separator(')')) => Ok(parsed),
                _ => Err(BasicError::syntax("Expected ')'")),
            }
        }

        token => Err(BasicError::syntax(format!("Unexpected '{}' in expression", token))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expression {
        let mut scanner = Scanner::new(source);
        let expr = parse_expression(&mut scanner).unwrap();
        assert!(!scanner.has_more_tokens(), "unparsed input in {:?}", source);
        expr
    }

    fn eval(source: &str, variables: &VariableTable) -> Result<i32> {
        parse(source).evaluate(variables)
    }

    #[test]
    fn test_parse_constant_and_identifier() {
        assert_eq!(parse("42"), Expression::Constant(42));
        assert_eq!(parse("X"), Expression::Identifier("X".to_string()));
    }

    #[test]
    fn test_parse_operator_precedence() {
        // "2 + 3 * 4" should be 2 + (3 * 4)
        assert_eq!(
            parse("2 + 3 * 4"),
            Expression::compound(
                BinaryOperator::Add,
                Expression::Constant(2),
                Expression::compound(
                    BinaryOperator::Multiply,
                    Expression::Constant(3),
                    Expression::Constant(4),
                ),
            )
        );
    }

    #[test]
    fn test_left_associative() {
        let variables = VariableTable::new();
        assert_eq!(eval("10 - 4 - 3", &variables), Ok(3));
        assert_eq!(eval("100 / 10 / 5", &variables), Ok(2));
        assert_eq!(parse("8 - 2 + 1").to_string(), "((8 - 2) + 1)");
    }

    #[test]
    fn test_parentheses_and_unary() {
        let mut variables = VariableTable::new();
        variables.set("X", 5);
        assert_eq!(eval("(2 + 3) * 4", &variables), Ok(20));
        assert_eq!(eval("-X + 1", &variables), Ok(-4));
        assert_eq!(eval("-(X * 2)", &variables), Ok(-10));
        assert_eq!(parse("-7"), Expression::Constant(-7));
        assert_eq!(eval("+3", &variables), Ok(3));
    }

    #[test]
    fn test_division_truncates() {
        let variables = VariableTable::new();
        assert_eq!(eval("7 / 2", &variables), Ok(3));
        assert_eq!(eval("-7 / 2", &variables), Ok(-3));
    }

    #[test]
    fn test_evaluation_errors() {
        let variables = VariableTable::new();
        assert_eq!(eval("1 / 0", &variables), Err(BasicError::DivisionByZero));
        assert_eq!(
            eval("Y + 1", &variables),
            Err(BasicError::UndefinedVariable("Y".to_string()))
        );
    }

    #[test]
    fn test_stops_at_comparison() {
        let mut scanner = Scanner::new("X + 1 < 3");
        let expr = parse_expression(&mut scanner).unwrap();
        assert_eq!(expr.to_string(), "(X + 1)");
        assert_eq!(scanner.next_token().unwrap(), Some(Token::Operator('<')));
    }

    #[test]
    fn test_syntax_errors() {
        for source in ["", "(1 + 2", "3 + ", "*4", ")"] {
            let mut scanner = Scanner::new(source);
            assert!(
                matches!(
                    parse_expression(&mut scanner),
                    Err(BasicError::SyntaxError { .. })
                ),
                "expected syntax error for {:?}",
                source
            );
        }
    }

    #[test]
    fn test_overflow_wraps() {
        let variables = VariableTable::new();
        assert_eq!(eval("2147483647 + 1", &variables), Ok(i32::MIN));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let mut scanner = Scanner::new(&deep);
        assert_eq!(
            parse_expression(&mut scanner),
            Err(BasicError::syntax("Expression too deeply nested"))
        );

        let chain = vec!["1"; 10_000].join(" + ");
        let mut scanner = Scanner::new(&chain);
        assert!(parse_expression(&mut scanner).is_err());

        let signs = format!("{}X", "-".repeat(10_000));
        let mut scanner = Scanner::new(&signs);
        assert!(parse_expression(&mut scanner).is_err());

        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&shallow), Expression::Constant(1));
        let variables = VariableTable::new();
        assert_eq!(eval(&vec!["1"; 200].join(" + "), &variables), Ok(200));
    }
}
