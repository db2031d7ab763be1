//! BASIC statements
//!
//! Each statement is parsed from a scanner positioned just after the line
//! number and executed against the variable table. Execution reports how
//! control should continue through `Flow` rather than moving a program
//! counter itself.

use crate::console::Console;
use crate::error::{BasicError, Result};
use crate::expression::{parse_expression, Expression};
use crate::tokenizer::{Keyword, Scanner, Token};
use crate::variables::VariableTable;
use crate::LineNumber;
use std::fmt;

/// Prompt shown by INPUT
pub const INPUT_PROMPT: &str = " ? ";

/// Comparison operators accepted by IF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    GreaterThan,
    LessThan,
}

impl Comparison {
    fn from_char(op: char) -> Option<Comparison> {
        match op {
            '=' => Some(Comparison::Equal),
            '>' => Some(Comparison::GreaterThan),
            '<' => Some(Comparison::LessThan),
            _ => None,
        }
    }

    /// Operator character as written in source
    pub fn symbol(self) -> char {
        match self {
            Comparison::Equal => '=',
            Comparison::GreaterThan => '>',
            Comparison::LessThan => '<',
        }
    }

    /// Apply the comparison to two values
    pub fn holds(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Comparison::Equal => lhs == rhs,
            Comparison::GreaterThan => lhs > rhs,
            Comparison::LessThan => lhs < rhs,
        }
    }
}

/// Where execution goes after a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fall through to the next line in ascending order
    Continue,
    /// Transfer control to a line
    JumpTo(LineNumber),
    /// Stop the program
    Halt,
}

/// BASIC statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// REM statement (comment)
    Rem { comment: String },
    /// Variable assignment (LET X = 5 or X = 5)
    Let { name: String, expression: Expression },
    /// PRINT statement
    Print { expression: Expression },
    /// INPUT statement
    Input { name: String },
    /// GOTO statement
    Goto { target: LineNumber },
    /// IF lhs op rhs THEN n
    If {
        lhs: Expression,
        comparison: Comparison,
        rhs: Expression,
        target: LineNumber,
    },
    /// END statement
    End,
}

impl Statement {
    /// The keyword that introduces this statement
    pub fn keyword(&self) -> Keyword {
        match self {
            Statement::Rem { .. } => Keyword::Rem,
            Statement::Let { .. } => Keyword::Let,
            Statement::Print { .. } => Keyword::Print,
            Statement::Input { .. } => Keyword::Input,
            Statement::Goto { .. } => Keyword::Goto,
            Statement::If { .. } => Keyword::If,
            Statement::End => Keyword::End,
        }
    }

    /// Check if this statement can change which line runs next
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Statement::Goto { .. } | Statement::If { .. } | Statement::End)
    }

    /// Execute the statement
    pub fn execute(
        &self,
        variables: &mut VariableTable,
        console: &mut dyn Console,
    ) -> Result<Flow> {
        match self {
            Statement::Rem { .. } => Ok(Flow::Continue),
            Statement::Let { name, expression } => {
                let value = expression.evaluate(variables)?;
                variables.set(name, value);
                Ok(Flow::Continue)
            }
            Statement::Print { expression } => {
                let value = expression.evaluate(variables)?;
                console.write_line(&value.to_string())?;
                Ok(Flow::Continue)
            }
            Statement::Input { name } => {
                let value = console.read_integer(INPUT_PROMPT)?;
                variables.set(name, value);
                Ok(Flow::Continue)
            }
            Statement::Goto { target } => Ok(Flow::JumpTo(*target)),
            Statement::If {
                lhs,
                comparison,
                rhs,
                target,
            } => {
                let lhs_val = lhs.evaluate(variables)?;
                let rhs_val = rhs.evaluate(variables)?;
                if comparison.holds(lhs_val, rhs_val) {
                    Ok(Flow::JumpTo(*target))
                } else {
                    Ok(Flow::Continue)
                }
            }
            Statement::End => Ok(Flow::Halt),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Rem { comment } if comment.is_empty() => f.write_str("REM"),
            Statement::Rem { comment } => write!(f, "REM {}", comment),
            Statement::Let { name, expression } => write!(f, "LET {} = {}", name, expression),
            Statement::Print { expression } => write!(f, "PRINT {}", expression),
            Statement::Input { name } => write!(f, "INPUT {}", name),
            Statement::Goto { target } => write!(f, "GOTO {}", target),
            Statement::If {
                lhs,
                comparison,
                rhs,
                target,
            } => write!(f, "IF {} {} {} THEN {}", lhs, comparison.symbol(), rhs, target),
            Statement::End => f.write_str("END"),
        }
    }
}

/// Parse one statement from the scanner
pub fn parse_statement(scanner: &mut Scanner) -> Result<Statement> {
    let token = scanner
        .next_token()?
        .ok_or_else(|| BasicError::syntax("Expected a statement"))?;

    match token {
        Token::Keyword(Keyword::Rem) => {
            // Everything after REM is a comment
            let comment = scanner.rest().to_string();
            Ok(Statement::Rem { comment })
        }

        Token::Keyword(Keyword::Let) => parse_assignment(scanner),

        // Assignment without LET keyword
        Token::Identifier(_) => {
            scanner.save_token(token);
            parse_assignment(scanner)
        }

        Token::Keyword(Keyword::Print) => parse_print_statement(scanner),
        Token::Keyword(Keyword::Input) => parse_input_statement(scanner),
        Token::Keyword(Keyword::Goto) => parse_goto_statement(scanner),
        Token::Keyword(Keyword::If) => parse_if_statement(scanner),

        Token::Keyword(Keyword::End) => {
            expect_end(scanner)?;
            Ok(Statement::End)
        }

        Token::Keyword(keyword) if keyword.is_command() => Err(BasicError::syntax(format!(
            "{} is a command, not a statement",
            keyword
        ))),

        token => Err(BasicError::syntax(format!("Unknown statement: {}", token))),
    }
}

/// Parse assignment statement (X = 42 or LET X = 42)
fn parse_assignment(scanner: &mut Scanner) -> Result<Statement> {
    let name = expect_identifier(scanner, "Expected variable name")?;

    match scanner.next_token()? {
        Some(Token::Operator('=')) => {}
        _ => return Err(BasicError::syntax("Expected '=' in assignment")),
    }

    let expression = parse_expression(scanner)?;
    expect_end(scanner)?;

    Ok(Statement::Let { name, expression })
}

/// Parse PRINT statement
fn parse_print_statement(scanner: &mut Scanner) -> Result<Statement> {
    let expression = parse_expression(scanner)?;
    expect_end(scanner)?;
    Ok(Statement::Print { expression })
}

/// Parse INPUT statement
fn parse_input_statement(scanner: &mut Scanner) -> Result<Statement> {
    let name = expect_identifier(scanner, "Expected variable name after INPUT")?;
    expect_end(scanner)?;
    Ok(Statement::Input { name })
}

/// Parse GOTO statement
fn parse_goto_statement(scanner: &mut Scanner) -> Result<Statement> {
    let target = expect_line_number(scanner, "Expected line number after GOTO")?;
    expect_end(scanner)?;
    Ok(Statement::Goto { target })
}

/// Parse IF statement
/// Supports: IF expression (= | < | >) expression THEN line_number
fn parse_if_statement(scanner: &mut Scanner) -> Result<Statement> {
    let lhs = parse_expression(scanner)?;

    let comparison = match scanner.next_token()? {
        Some(Token::Operator(op)) => Comparison::from_char(op),
        _ => None,
    }
    .ok_or_else(|| BasicError::syntax("Expected '=', '<' or '>' in IF condition"))?;

    let rhs = parse_expression(scanner)?;

    match scanner.next_token()? {
        Some(Token::Keyword(Keyword::Then)) => {}
        _ => return Err(BasicError::syntax("Expected THEN after IF condition")),
    }

    let target = expect_line_number(scanner, "Expected line number after THEN")?;
    expect_end(scanner)?;

    Ok(Statement::If {
        lhs,
        comparison,
        rhs,
        target,
    })
}

fn expect_identifier(scanner: &mut Scanner, message: &str) -> Result<String> {
    match scanner.next_token()? {
        Some(Token::Identifier(name)) => Ok(name),
        _ => Err(BasicError::syntax(message)),
    }
}

fn expect_line_number(scanner: &mut Scanner, message: &str) -> Result<LineNumber> {
    match scanner.next_token()? {
        Some(Token::Number(value)) if value > 0 => Ok(value as LineNumber),
        _ => Err(BasicError::syntax(message)),
    }
}

/// Fail if anything follows a complete statement
fn expect_end(scanner: &mut Scanner) -> Result<()> {
    match scanner.next_token()? {
        None => Ok(()),
        Some(token) => Err(BasicError::syntax(format!("Unexpected '{}' after statement", token))),
    }
}
