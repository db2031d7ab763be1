//! Execution engine for BASIC programs
//!
//! Walks the program store from its first line, executing each parsed
//! statement and following the `Flow` it returns: fall through to the next
//! line, jump to a target line, or halt.

use crate::console::Console;
use crate::error::{BasicError, Result};
use crate::program::ProgramStore;
use crate::statement::{Flow, Statement};
use crate::variables::VariableTable;
use crate::LineNumber;

/// State of a program run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// About to execute the given line
    Running(LineNumber),
    /// Finished
    Halted,
}

/// BASIC program executor
#[derive(Debug, Clone, Default)]
pub struct Executor {
    // Write "[n]" before executing each line
    trace: bool,
}

impl Executor {
    /// Create a new executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable line tracing
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Turn line tracing on or off (TRON / TROFF)
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Whether line tracing is on
    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Initial state for a run of `program`
    pub fn start(program: &ProgramStore) -> RunState {
        match program.first() {
            Some(line) => RunState::Running(line),
            None => RunState::Halted,
        }
    }

    /// Execute one line and compute the next state.
    ///
    /// Failures carry the number of the line that was executing. Side
    /// effects of the failing statement that happened before the failure
    /// are kept.
    pub fn step(
        &self,
        program: &ProgramStore,
        variables: &mut VariableTable,
        console: &mut dyn Console,
        line: LineNumber,
    ) -> Result<RunState> {
        if !program.contains(line) {
            return Err(BasicError::LineNotFound(line));
        }
        variables.set_current_line(Some(line));
        let statement = program
            .parsed_statement(line)
            .ok_or(BasicError::MissingStatement(line))?;

        let next = self
            .execute_line(program, variables, console, line, statement)
            .map_err(|error| error.at_line(line))?;

        if next == RunState::Halted {
            variables.set_current_line(None);
        }
        Ok(next)
    }

    fn execute_line(
        &self,
        program: &ProgramStore,
        variables: &mut VariableTable,
        console: &mut dyn Console,
        line: LineNumber,
        statement: &Statement,
    ) -> Result<RunState> {
        if self.trace {
            console.write(&format!("[{}]", line))?;
        }

        match statement.execute(variables, console)? {
            Flow::Continue => Ok(match program.next(line)? {
                Some(next) => RunState::Running(next),
                None => RunState::Halted,
            }),
            Flow::JumpTo(target) => {
                if program.contains(target) {
                    Ok(RunState::Running(target))
                } else {
                    Err(BasicError::LineNotFound(target))
                }
            }
            Flow::Halt => Ok(RunState::Halted),
        }
    }

    /// Run `program` from its first line until it halts or fails
    pub fn run(
        &self,
        program: &ProgramStore,
        variables: &mut VariableTable,
        console: &mut dyn Console,
    ) -> Result<()> {
        let mut state = Self::start(program);
        if state == RunState::Halted {
            variables.set_current_line(None);
        }

        let mut last = None;
        let result = loop {
            let line = match state {
                RunState::Running(line) => line,
                RunState::Halted => break Ok(()),
            };
            last = Some(line);
            match self.step(program, variables, console, line) {
                Ok(next) => state = next,
                Err(error) => break Err(error),
            }
        };

        // Close the trace line unless a PRINT already did
        if self.trace {
            if let Some(line) = last {
                let printed = matches!(
                    program.parsed_statement(line),
                    Some(Statement::Print { .. })
                );
                if result.is_err() || !printed {
                    console.write("\n")?;
                }
            }
        }

        result
    }
}

/// Run `program` with default settings
pub fn run(
    program: &ProgramStore,
    variables: &mut VariableTable,
    console: &mut dyn Console,
) -> Result<()> {
    Executor::new().run(program, variables, console)
}
