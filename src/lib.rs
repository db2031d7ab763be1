//! Minimal BASIC
//!
//! A line-numbered program store and statement execution engine for a small
//! integer-only BASIC dialect. Numbered lines are entered, edited, listed and
//! run; control flow moves between lines by number through GOTO and IF.

pub mod console;
pub mod executor;
pub mod expression;
pub mod interpreter;
pub mod program;
pub mod statement;
pub mod tokenizer;
pub mod variables;

// Re-export core types for convenience
pub use crate::error::{BasicError, Result};
pub use console::{BufferConsole, Console, StdConsole};
pub use executor::{run, Executor, RunState};
pub use expression::{BinaryOperator, Expression};
pub use interpreter::{Interpreter, Outcome};
pub use program::{ProgramStore, SourceLine};
pub use statement::{Comparison, Flow, Statement};
pub use tokenizer::{Keyword, Scanner, Token};
pub use variables::VariableTable;

/// A user-assigned program line number
pub type LineNumber = u32;

/// Core error handling types for the interpreter
pub mod error {
    use crate::LineNumber;
    use std::fmt;

    /// Result type for BASIC operations
    pub type Result<T> = std::result::Result<T, BasicError>;

    /// Failures raised while parsing or running BASIC
    #[derive(Debug, Clone, PartialEq)]
    pub enum BasicError {
        // Parse errors
        SyntaxError {
            message: String,
            line: Option<LineNumber>,
        },

        // Expression errors
        UndefinedVariable(String),
        DivisionByZero,

        // Control flow errors
        LineNotFound(LineNumber),
        MissingStatement(LineNumber),

        // Console errors
        EndOfInput,
        Io(String),

        /// A failure raised while RUN was executing `line`
        AtLine {
            line: LineNumber,
            error: Box<BasicError>,
        },
    }

    impl BasicError {
        /// Build a syntax error with no line attached yet
        pub fn syntax(message: impl Into<String>) -> Self {
            BasicError::SyntaxError {
                message: message.into(),
                line: None,
            }
        }

        /// Attach the line that was executing when this error was raised
        pub fn at_line(self, line: LineNumber) -> Self {
            match self {
                BasicError::SyntaxError { message, .. } => BasicError::SyntaxError {
                    message,
                    line: Some(line),
                },
                wrapped @ BasicError::AtLine { .. } => wrapped,
                error => BasicError::AtLine {
                    line,
                    error: Box::new(error),
                },
            }
        }

        /// The underlying failure kind, without line context
        pub fn root(&self) -> &BasicError {
            match self {
                BasicError::AtLine { error, .. } => error.root(),
                error => error,
            }
        }

        /// The line this error is associated with, if any
        pub fn line(&self) -> Option<LineNumber> {
            match self {
                BasicError::SyntaxError { line, .. } => *line,
                BasicError::AtLine { line, .. } | BasicError::MissingStatement(line) => {
                    Some(*line)
                }
                _ => None,
            }
        }
    }

    impl fmt::Display for BasicError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                BasicError::SyntaxError { message, line } => {
                    if let Some(line_num) = line {
                        write!(f, "Syntax error at line {}: {}", line_num, message)
                    } else {
                        write!(f, "Syntax error: {}", message)
                    }
                }
                BasicError::UndefinedVariable(name) => write!(f, "{} is undefined", name),
                BasicError::DivisionByZero => write!(f, "Division by zero"),
                BasicError::LineNotFound(line) => write!(f, "Line number {} not found", line),
                BasicError::MissingStatement(line) => {
                    write!(f, "Line {} has no valid statement", line)
                }
                BasicError::EndOfInput => write!(f, "Unexpected end of input"),
                BasicError::Io(msg) => write!(f, "I/O error: {}", msg),
                BasicError::AtLine { line, error } => write!(f, "{} in line {}", error, line),
            }
        }
    }

    impl std::error::Error for BasicError {}

    impl From<std::io::Error> for BasicError {
        fn from(error: std::io::Error) -> Self {
            BasicError::Io(error.to_string())
        }
    }

}
