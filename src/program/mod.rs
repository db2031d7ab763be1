//! Program storage for BASIC
//!
//! Manages numbered program lines with their parsed statements, kept in
//! ascending line-number order.

use crate::error::{BasicError, Result};
use crate::statement::Statement;
use crate::LineNumber;
use std::collections::BTreeMap;
use std::ops::Bound;

/// A stored program line
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    /// Text exactly as entered, line number included
    pub text: String,
    /// Parsed form; absent until the text parses successfully
    pub statement: Option<Statement>,
}

/// Program line storage
#[derive(Debug, Clone, Default)]
pub struct ProgramStore {
    lines: BTreeMap<LineNumber, SourceLine>,
}

impl ProgramStore {
    /// Create a new program store
    pub fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
        }
    }

    /// Store a program line, replacing any existing text and dropping its
    /// parsed statement
    pub fn add_or_replace(&mut self, line_number: LineNumber, text: impl Into<String>) {
        self.lines.insert(
            line_number,
            SourceLine {
                text: text.into(),
                statement: None,
            },
        );
    }

    /// Attach a parsed statement to an existing line
    pub fn set_parsed(&mut self, line_number: LineNumber, statement: Statement) -> Result<()> {
        let line = self
            .lines
            .get_mut(&line_number)
            .ok_or(BasicError::LineNotFound(line_number))?;
        line.statement = Some(statement);
        Ok(())
    }

    /// Delete a program line; absent lines are ignored
    pub fn remove(&mut self, line_number: LineNumber) {
        self.lines.remove(&line_number);
    }

    /// Text of a line, or the empty string if there is no such line
    pub fn raw_text(&self, line_number: LineNumber) -> &str {
        self.lines
            .get(&line_number)
            .map(|line| line.text.as_str())
            .unwrap_or("")
    }

    /// Parsed statement of a line, if it exists and parsed
    pub fn parsed_statement(&self, line_number: LineNumber) -> Option<&Statement> {
        self.lines
            .get(&line_number)
            .and_then(|line| line.statement.as_ref())
    }

    /// Lowest line number
    pub fn first(&self) -> Option<LineNumber> {
        self.lines.keys().next().copied()
    }

    /// Line number following `line_number`, which must be in the program
    pub fn next(&self, line_number: LineNumber) -> Result<Option<LineNumber>> {
        if !self.lines.contains_key(&line_number) {
            return Err(BasicError::LineNotFound(line_number));
        }
        Ok(self
            .lines
            .range((Bound::Excluded(line_number), Bound::Unbounded))
            .next()
            .map(|(&number, _)| number))
    }

    /// Clear all program lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// True if `line_number` is stored
    pub fn contains(&self, line_number: LineNumber) -> bool {
        self.lines.contains_key(&line_number)
    }

    /// Number of stored lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if no lines are stored
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in ascending order
    pub fn lines(&self) -> impl Iterator<Item = (LineNumber, &SourceLine)> + '_ {
        self.lines.iter().map(|(&number, line)| (number, line))
    }
}
