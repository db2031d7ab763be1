//! Variable storage for BASIC programs
//!
//! A flat table of integer variables, created on first assignment and never
//! deleted, plus the current-line register the run loop keeps up to date.

use crate::error::{BasicError, Result};
use crate::LineNumber;
use std::collections::HashMap;

/// Variable storage and execution position
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    values: HashMap<String, i32>,
    // Line being executed; None once a run has completed
    current_line: Option<LineNumber>,
}

impl VariableTable {
    /// Create an empty variable table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, creating it if needed
    pub fn set(&mut self, name: &str, value: i32) {
        match self.values.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    /// Get a variable
    pub fn get(&self, name: &str) -> Result<i32> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| BasicError::UndefinedVariable(name.to_string()))
    }

    /// Check if a variable has been assigned
    pub fn is_defined(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of defined variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variable names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Record the line about to execute, or `None` when the program is complete
    pub fn set_current_line(&mut self, line: Option<LineNumber>) {
        self.current_line = line;
    }

    pub fn current_line(&self) -> Option<LineNumber> {
        self.current_line
    }
}
