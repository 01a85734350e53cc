// Dweve Weft - Typed Readers for Line-Oriented Text
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Token stream and variable bindings for one parse.
//!
//! A [`Context`] owns the raw lines of one input, serves them token by token
//! or line by line, and holds the variables readers bind along the way. It
//! enforces two invariants:
//!
//! - a line must be fully consumed before the stream moves to the next one
//!   ([`ParseError::IncompleteLineRead`]);
//! - all non-blank input must be consumed by the time the context is closed
//!   ([`ParseError::IncompleteRead`]).
//!
//! # Examples
//!
//! ```rust
//! use weft_core::Context;
//!
//! let mut ctx = Context::from_text("3\na b c");
//! let count: usize = ctx.next_token().unwrap().parse().unwrap();
//! let items = ctx.next_line().unwrap();
//! assert_eq!(count, items.len());
//! assert_eq!(ctx.current_line_number(), 2);
//! ctx.close().unwrap();
//! ```

use crate::config::ParseConfig;
use crate::error::{ParseError, ParseResult};
use std::collections::HashMap;
use tracing::trace;

/// The line under the cursor.
#[derive(Debug)]
struct CurrentLine {
    /// Line number (1-based).
    number: usize,
    tokens: Vec<String>,
    /// Index of the next unread token.
    position: usize,
}

impl CurrentLine {
    fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }
}

/// Cursor over the lines of one input, plus the variables bound while reading.
#[derive(Debug)]
pub struct Context {
    lines: Vec<String>,
    /// Index of the next raw line to load.
    next: usize,
    current: Option<CurrentLine>,
    variables: HashMap<String, String>,
    config: ParseConfig,
}

impl Context {
    /// Create a context over the given lines with the default configuration.
    pub fn new(lines: Vec<String>) -> Self {
        Self::with_config(lines, ParseConfig::default())
    }

    /// Create a context with a specific configuration.
    pub fn with_config(lines: Vec<String>, config: ParseConfig) -> Self {
        Self {
            lines,
            next: 0,
            current: None,
            variables: HashMap::new(),
            config,
        }
    }

    /// Create a context over the lines of a text. Both LF and CRLF endings
    /// are accepted.
    pub fn from_text(input: &str) -> Self {
        Self::new(input.lines().map(str::to_owned).collect())
    }

    /// The configuration this context was created with.
    #[inline]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Total number of raw lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    // ==================== Reading ====================

    /// Read the next token, moving to the next line when the current one is
    /// exhausted. Blank lines are stepped over.
    pub fn next_token(&mut self) -> ParseResult<String> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if current.position < current.tokens.len() {
                    let token = std::mem::take(&mut current.tokens[current.position]);
                    current.position += 1;
                    return Ok(token);
                }
            }
            self.advance()?;
        }
    }

    /// Read all tokens of the next line.
    ///
    /// Fails with [`ParseError::IncompleteLineRead`] if the current line still
    /// has unread tokens. A blank line yields an empty list.
    pub fn next_line(&mut self) -> ParseResult<Vec<String>> {
        let current = self.advance()?;
        let tokens = std::mem::take(&mut current.tokens);
        current.position = 0;
        Ok(tokens)
    }

    fn advance(&mut self) -> ParseResult<&mut CurrentLine> {
        if let Some(current) = &self.current {
            let remaining = current.remaining();
            if remaining > 0 {
                return Err(ParseError::IncompleteLineRead {
                    line: current.number,
                    remaining,
                });
            }
        }

        let raw = self.lines.get(self.next).ok_or(ParseError::StreamExhausted {
            line: self.lines.len(),
        })?;
        let tokens = self.config.delimiter.split(raw);
        self.next += 1;
        trace!(line = self.next, tokens = tokens.len(), "advanced to line");

        Ok(self.current.insert(CurrentLine {
            number: self.next,
            tokens,
            position: 0,
        }))
    }

    // ==================== Position ====================

    /// Number of the line under the cursor (1-based), or 0 before the first
    /// read.
    #[inline]
    pub fn current_line_number(&self) -> usize {
        self.current.as_ref().map_or(0, |c| c.number)
    }

    /// Raw content of the line under the cursor, or `""` before the first
    /// read.
    pub fn current_line(&self) -> &str {
        self.current
            .as_ref()
            .and_then(|c| self.lines.get(c.number - 1))
            .map_or("", String::as_str)
    }

    /// `(line number, raw content)` of the line under the cursor.
    #[inline]
    pub fn line_context(&self) -> (usize, &str) {
        (self.current_line_number(), self.current_line())
    }

    /// Unread tokens left on the current line.
    #[inline]
    pub fn remaining_tokens(&self) -> usize {
        self.current.as_ref().map_or(0, CurrentLine::remaining)
    }

    /// Whether any unread tokens or non-blank lines remain.
    pub fn has_more(&self) -> bool {
        self.remaining_tokens() > 0
            || self.lines[self.next..]
                .iter()
                .any(|line| !line.trim().is_empty())
    }

    /// Attach the current line number and content to an error. Errors raised
    /// before the first line was read are returned unchanged.
    pub fn at_current_line(&self, err: ParseError) -> ParseError {
        match self.line_context() {
            (0, _) => err,
            (line, content) => err.at_line(line, content),
        }
    }

    // ==================== Variables ====================

    /// Bind a variable, replacing any previous value.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        trace!(variable = %name, value = %value, "bound variable");
        self.variables.insert(name, value);
    }

    /// Look up a variable.
    pub fn variable(&self, name: &str) -> ParseResult<&str> {
        self.variables
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ParseError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Look up a variable and read it as an integer.
    pub fn variable_as_int(&self, name: &str) -> ParseResult<i64> {
        let value = self.variable(name)?;
        value
            .trim()
            .parse()
            .map_err(|_| ParseError::VariableConversion {
                name: name.to_string(),
                value: value.to_string(),
            })
    }

    /// All bound variables.
    #[inline]
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Consume the context, keeping only its variables.
    pub fn into_variables(self) -> HashMap<String, String> {
        self.variables
    }

    // ==================== Closing ====================

    /// Check that the input was consumed exactly.
    ///
    /// Fails with [`ParseError::IncompleteLineRead`] if the current line has
    /// unread tokens, or [`ParseError::IncompleteRead`] if non-blank lines
    /// remain. Trailing blank lines are ignored.
    pub fn close(&self) -> ParseResult<()> {
        if let Some(current) = &self.current {
            let remaining = current.remaining();
            if remaining > 0 {
                return Err(ParseError::IncompleteLineRead {
                    line: current.number,
                    remaining,
                });
            }
        }

        let mut unread = self.lines[self.next..]
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        match unread.next() {
            None => Ok(()),
            Some((offset, content)) => Err(ParseError::IncompleteRead {
                remaining: 1 + unread.count(),
                line: self.next + offset + 1,
                content: content.clone(),
            }),
        }
    }
}
