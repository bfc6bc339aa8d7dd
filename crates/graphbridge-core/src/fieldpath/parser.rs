//! Field path parser
//!
//! Hand-rolled character parser for the dot/index path dialect with
//! positioned errors.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use super::error::FieldPathError;
use super::Segment;
use std::iter::Peekable;
use std::str::Chars;

/// Field path parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self, FieldPathError> {
        if input.is_empty() {
            return Err(FieldPathError::parse("Empty field path", 0, input));
        }

        Ok(Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        })
    }

    /// Parse the input into a segment list
    ///
    /// Paths start with a field name; index segments follow in brackets:
    /// `asset.files[0].url`.
    pub fn parse(mut self) -> Result<Vec<Segment>, FieldPathError> {
        let mut segments = Vec::new();

        segments.push(Segment::Key(self.parse_key()?));
        self.parse_indexes(&mut segments)?;

        while !self.is_at_end() {
            self.expect_char('.')?;
            segments.push(Segment::Key(self.parse_key()?));
            self.parse_indexes(&mut segments)?;
        }

        Ok(segments)
    }

    /// Parse a field name
    fn parse_key(&mut self) -> Result<String, FieldPathError> {
        let mut key = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                key.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if key.is_empty() {
            return Err(FieldPathError::parse(
                "Expected field name",
                self.position,
                self.input,
            ));
        }

        Ok(key)
    }

    /// Parse zero or more `[n]` index segments
    fn parse_indexes(&mut self, segments: &mut Vec<Segment>) -> Result<(), FieldPathError> {
        while self.current_char() == Some('[') {
            self.advance();
            let index = self.parse_index()?;
            self.expect_char(']')?;
            segments.push(Segment::Index(index));
        }
        Ok(())
    }

    /// Parse a non-negative array index
    fn parse_index(&mut self) -> Result<usize, FieldPathError> {
        let start = self.position;
        let mut digits = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if digits.is_empty() {
            return Err(FieldPathError::parse(
                "Expected array index",
                self.position,
                self.input,
            ));
        }

        digits.parse().map_err(|_| {
            FieldPathError::parse(format!("Invalid array index: {}", digits), start, self.input)
        })
    }

    /// Consume the expected character or fail
    fn expect_char(&mut self, expected: char) -> Result<(), FieldPathError> {
        match self.current_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(FieldPathError::parse(
                format!("Expected '{}', found '{}'", expected, ch),
                self.position,
                self.input,
            )),
            None => Err(FieldPathError::parse(
                format!("Expected '{}', found end of input", expected),
                self.position,
                self.input,
            )),
        }
    }

    /// Get current character without advancing
    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
            Some(ch)
        } else {
            None
        }
    }

    /// Check if at end of input
    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }
}
