//! Tokenizer for BASIC source lines
//!
//! Scans a line of text lazily into numbers, identifiers, keywords, operators
//! and separators. Statement parsers pull tokens one at a time and may push a
//! single token back after looking at it.

use crate::error::{BasicError, Result};
use std::fmt;

/// Reserved words, matched without regard to case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Print,
    Input,
    Goto,
    If,
    Then,
    End,
    Rem,
    Run,
    List,
    Clear,
    Help,
    Quit,
    Tron,
    Troff,
}

// Keyword spellings
const KEYWORDS: &[(&str, Keyword)] = &[
    // Statements
    ("LET", Keyword::Let),
    ("PRINT", Keyword::Print),
    ("INPUT", Keyword::Input),
    ("GOTO", Keyword::Goto),
    ("IF", Keyword::If),
    ("THEN", Keyword::Then),
    ("END", Keyword::End),
    ("REM", Keyword::Rem),
    // Commands
    ("RUN", Keyword::Run),
    ("LIST", Keyword::List),
    ("CLEAR", Keyword::Clear),
    ("HELP", Keyword::Help),
    ("QUIT", Keyword::Quit),
    ("TRON", Keyword::Tron),
    ("TROFF", Keyword::Troff),
];

impl Keyword {
    /// Look up a word in the keyword table
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| spelling.eq_ignore_ascii_case(word))
            .map(|&(_, keyword)| keyword)
    }

    /// Canonical upper-case spelling
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|&&(_, keyword)| keyword == self)
            .map(|(spelling, _)| *spelling)
            .unwrap_or("?")
    }

    /// Keywords that are interactive commands rather than statements
    pub fn is_command(self) -> bool {
        matches!(
            self,
            Keyword::Run
                | Keyword::List
                | Keyword::Clear
                | Keyword::Help
                | Keyword::Quit
                | Keyword::Tron
                | Keyword::Troff
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a single token in a BASIC line
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unsigned integer literal
    Number(i32),
    /// Variable name
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// Operators (+, -, *, /, =, <, >)
    Operator(char),
    /// Parentheses
    Separator(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Identifier(name) => f.write_str(name),
            Token::Keyword(keyword) => write!(f, "{}", keyword),
            Token::Operator(ch) | Token::Separator(ch) => write!(f, "{}", ch),
        }
    }
}

/// Lazy, restartable token stream over one line of text
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    // Start offset of the most recently returned token
    last_start: usize,
    // Pushed-back token and where it started
    saved: Option<(Token, usize)>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            last_start: 0,
            saved: None,
        }
    }

    /// Rewind to the start of the line
    pub fn reset(&mut self) {
        self.pos = 0;
        self.last_start = 0;
        self.saved = None;
    }

    /// The full text being scanned
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Read the next token, or `None` at end of line
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some((token, start)) = self.saved.take() {
            self.last_start = start;
            return Ok(Some(token));
        }

        self.skip_whitespace();
        let source = self.source;
        let start = self.pos;
        self.last_start = start;

        let ch = match source[start..].chars().next() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        let token = if ch.is_ascii_digit() {
            let end = self.scan_while(start, |c| c.is_ascii_digit());
            let text = &source[start..end];
            self.pos = end;
            let value = text
                .parse::<i32>()
                .map_err(|_| BasicError::syntax(format!("Number too large: {}", text)))?;
            Token::Number(value)
        } else if ch.is_ascii_alphabetic() {
            let end = self.scan_while(start, |c| c.is_ascii_alphanumeric() || c == '_');
            let word = &source[start..end];
            self.pos = end;
            match Keyword::lookup(word) {
                Some(keyword) => Token::Keyword(keyword),
                None => Token::Identifier(word.to_string()),
            }
        } else {
            self.pos = start + ch.len_utf8();
            match ch {
                '+' | '-' | '*' | '/' | '=' | '<' | '>' => Token::Operator(ch),
                '(' | ')' => Token::Separator(ch),
                _ => return Err(BasicError::syntax(format!("Unexpected character '{}'", ch))),
            }
        };

        Ok(Some(token))
    }

    /// Look at the next token without consuming it
    pub fn peek_token(&mut self) -> Result<Option<Token>> {
        let token = self.next_token()?;
        if let Some(token) = &token {
            self.saved = Some((token.clone(), self.last_start));
        }
        Ok(token)
    }

    /// Push back the token most recently returned by `next_token`
    pub fn save_token(&mut self, token: Token) {
        debug_assert!(self.saved.is_none(), "only one token of pushback");
        self.saved = Some((token, self.last_start));
    }

    /// True if any non-blank input remains
    pub fn has_more_tokens(&self) -> bool {
        self.saved.is_some() || !self.source[self.pos..].trim().is_empty()
    }

    /// Consume and return the unscanned remainder of the line, trimmed
    pub fn rest(&mut self) -> &'a str {
        if let Some((_, start)) = self.saved.take() {
            self.pos = start;
        }
        let source = self.source;
        let rest = &source[self.pos..];
        self.pos = source.len();
        rest.trim()
    }

    fn skip_whitespace(&mut self) {
        self.pos = self.scan_while(self.pos, char::is_whitespace);
    }

    fn scan_while(&self, start: usize, pred: impl Fn(char) -> bool) -> usize {
        self.source[start..]
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(offset, _)| start + offset)
            .unwrap_or(self.source.len())
    }
}

/// Tokenize a whole line eagerly
pub fn tokenize(source_line: &str) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new(source_line);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_statement() {
        let tokens = tokenize("10 LET X = Y + 42").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(10),
                Token::Keyword(Keyword::Let),
                Token::Identifier("X".to_string()),
                Token::Operator('='),
                Token::Identifier("Y".to_string()),
                Token::Operator('+'),
                Token::Number(42),
            ]
        );
    }

    #[test]
    fn test_keywords_ignore_case() {
        assert_eq!(Keyword::lookup("print"), Some(Keyword::Print));
        assert_eq!(Keyword::lookup("GoTo"), Some(Keyword::Goto));
        assert_eq!(Keyword::lookup("PRINTX"), None);
        assert_eq!(Keyword::Then.as_str(), "THEN");
        assert!(Keyword::Run.is_command());
        assert!(!Keyword::Let.is_command());
    }

    #[test]
    fn test_no_whitespace_needed() {
        let tokens = tokenize("X=(A*2)/B").unwrap();
        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[2], Token::Separator('('));
        assert_eq!(tokens[7], Token::Operator('/'));
    }

    #[test]
    fn test_unexpected_character_is_lazy() {
        let mut scanner = Scanner::new("REM it's fine");
        assert_eq!(scanner.next_token().unwrap(), Some(Token::Keyword(Keyword::Rem)));
        assert_eq!(scanner.rest(), "it's fine");
        assert!(!scanner.has_more_tokens());

        assert!(matches!(
            tokenize("PRINT 'x'"),
            Err(BasicError::SyntaxError { .. })
        ));
    }

    #[test]
    fn test_number_too_large() {
        assert!(tokenize("PRINT 99999999999").is_err());
        assert_eq!(tokenize("2147483647").unwrap(), vec![Token::Number(i32::MAX)]);
    }

    #[test]
    fn test_peek_and_pushback() {
        let mut scanner = Scanner::new("A B");
        assert_eq!(
            scanner.peek_token().unwrap(),
            Some(Token::Identifier("A".to_string()))
        );
        let a = scanner.next_token().unwrap().unwrap();
        assert_eq!(a, Token::Identifier("A".to_string()));
        let b = scanner.next_token().unwrap().unwrap();
        scanner.save_token(b.clone());
        assert!(scanner.has_more_tokens());
        assert_eq!(scanner.rest(), "B");
        assert_eq!(scanner.next_token().unwrap(), None);
    }

    #[test]
    fn test_reset_restarts_scan() {
        let mut scanner = Scanner::new("  PRINT 1  ");
        while scanner.next_token().unwrap().is_some() {}
        assert!(!scanner.has_more_tokens());
        scanner.reset();
        assert_eq!(
            scanner.next_token().unwrap(),
            Some(Token::Keyword(Keyword::Print))
        );
    }
}
