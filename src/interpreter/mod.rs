//! Interactive command layer
//!
//! Decides what each entered line means: a numbered program line to store or
//! delete, a command (RUN, LIST, CLEAR, HELP, QUIT, TRON, TROFF), or a
//! statement to execute immediately.

use crate::console::Console;
use crate::error::{BasicError, Result};
use crate::executor::Executor;
use crate::program::ProgramStore;
use crate::statement::parse_statement;
use crate::tokenizer::{Keyword, Scanner, Token};
use crate::variables::VariableTable;
use crate::LineNumber;

/// Greeting shown when the interpreter starts
pub const BANNER: &str = "Minimal BASIC -- Type HELP for help";

const HELP_TEXT: &[&str] = &[
    "Available commands:",
    "   RUN   - Runs the program",
    "   LIST  - Lists the program",
    "   CLEAR - Clears the program",
    "   TRON  - Turns line tracing on",
    "   TROFF - Turns line tracing off",
    "   HELP  - Prints this message",
    "   QUIT  - Exits from the BASIC interpreter",
    "",
    "Program lines:",
    "   10 LET X = 5            - Store a line",
    "   10                      - Delete line 10",
    "",
    "Statements:",
    "   REM text                - Comment",
    "   LET X = expr            - Assign (LET is optional)",
    "   PRINT expr              - Print a value",
    "   INPUT X                 - Read an integer",
    "   GOTO n                  - Jump to line n",
    "   IF a (=|<|>) b THEN n   - Jump to line n when the comparison holds",
    "   END                     - Stop the program",
];

/// What the caller should do after a line has been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Program, variables and settings for one interactive session
#[derive(Debug, Default)]
pub struct Interpreter {
    program: ProgramStore,
    variables: VariableTable,
    executor: Executor,
}

impl Interpreter {
    /// Create an interpreter with an empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with line tracing on or off
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.executor.set_trace(trace);
        self
    }

    /// The stored program
    pub fn program(&self) -> &ProgramStore {
        &self.program
    }

    /// Mutable access to the stored program
    pub fn program_mut(&mut self) -> &mut ProgramStore {
        &mut self.program
    }

    /// The variable table shared by all runs
    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn trace(&self) -> bool {
        self.executor.trace()
    }

    /// Process one line of user input
    pub fn process_line(&mut self, line: &str, console: &mut dyn Console) -> Result<Outcome> {
        let text = line.trim();
        let mut scanner = Scanner::new(text);

        let first = match scanner.next_token()? {
            Some(token) => token,
            None => return Ok(Outcome::Continue),
        };

        match first {
            Token::Number(number) => {
                self.enter_line(number, text, &mut scanner)?;
                Ok(Outcome::Continue)
            }
            Token::Keyword(keyword) if keyword.is_command() => {
                if let Some(token) = scanner.next_token()? {
                    return Err(BasicError::syntax(format!(
                        "Unexpected '{}' after {}",
                        token, keyword
                    )));
                }
                self.execute_command(keyword, console)
            }
            token => {
                scanner.save_token(token);
                self.execute_direct(&mut scanner, console)?;
                Ok(Outcome::Continue)
            }
        }
    }

    /// Store, replace or delete a numbered line
    fn enter_line(&mut self, number: i32, text: &str, scanner: &mut Scanner) -> Result<()> {
        if number <= 0 {
            return Err(BasicError::syntax("Line numbers must be positive"));
        }
        let line_number = number as LineNumber;

        if !scanner.has_more_tokens() {
            self.program.remove(line_number);
            return Ok(());
        }

        // The text stays stored even when it does not parse
        self.program.add_or_replace(line_number, text);
        let statement = parse_statement(scanner).map_err(|error| error.at_line(line_number))?;
        self.program.set_parsed(line_number, statement)
    }

    /// Execute a statement typed without a line number
    fn execute_direct(&mut self, scanner: &mut Scanner, console: &mut dyn Console) -> Result<()> {
        let statement = parse_statement(scanner)?;
        if statement.is_control_flow() {
            return Err(BasicError::syntax(format!(
                "{} is only allowed in a numbered line",
                statement.keyword()
            )));
        }
        statement.execute(&mut self.variables, console)?;
        Ok(())
    }

    fn execute_command(&mut self, command: Keyword, console: &mut dyn Console) -> Result<Outcome> {
        match command {
            Keyword::Run => {
                self.executor.run(&self.program, &mut self.variables, console)?;
            }
            Keyword::List => {
                for (_, line) in self.program.lines() {
                    console.write_line(&line.text)?;
                }
            }
            Keyword::Clear => self.program.clear(),
            Keyword::Help => {
                for line in HELP_TEXT {
                    console.write_line(line)?;
                }
            }
            Keyword::Quit => return Ok(Outcome::Quit),
            Keyword::Tron => self.executor.set_trace(true),
            Keyword::Troff => self.executor.set_trace(false),
            keyword => return Err(BasicError::syntax(format!("{} is not a command", keyword))),
        }
        Ok(Outcome::Continue)
    }
}
