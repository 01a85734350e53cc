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

//! Error types for reader execution.
//!
//! Every failure a parse can produce is a [`ParseError`]. Errors raised while a
//! line is being read are enriched with the 1-based line number and the raw
//! line content exactly once ([`ParseError::AtLine`]); errors raised inside a
//! repeated section additionally record which element failed
//! ([`ParseError::InElement`]).
//!
//! Use [`ParseError::kind`] to match on the failure category regardless of
//! how many context layers wrap it, and [`ParseError::line`] to recover the
//! line number.
//!
//! # Examples
//!
//! ```rust
//! use weft_core::{ErrorKind, ParseError};
//!
//! let err = ParseError::ArityMismatch { expected: 2, got: 3 }.at_line(1, "1 2 3");
//! assert_eq!(err.kind(), ErrorKind::ArityMismatch);
//! assert_eq!(err.line(), Some(1));
//! assert!(err.to_string().contains("'1 2 3'"));
//! ```

use crate::convert::Kind;
use std::fmt;
use thiserror::Error;

/// The category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input requested past the end of the stream.
    StreamExhausted,
    /// A line was left with unread tokens.
    IncompleteLineRead,
    /// Non-blank lines remained when the stream was closed.
    IncompleteRead,
    /// Token count differs from the number the reader expects.
    ArityMismatch,
    /// A descriptor names an attribute the shape does not have.
    UnknownAttribute,
    /// A descriptor is malformed.
    InvalidDescriptor,
    /// A token could not be converted to the requested kind.
    ConversionFailure,
    /// A variable was read before it was bound.
    UndefinedVariable,
    /// A variable holds a value that is not an integer.
    VariableConversion,
    /// The size of a repeated section could not be resolved.
    SizeResolution,
    /// A repeated section asked for more elements than allowed.
    RepeatLimit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamExhausted => write!(f, "StreamExhausted"),
            Self::IncompleteLineRead => write!(f, "IncompleteLineRead"),
            Self::IncompleteRead => write!(f, "IncompleteRead"),
            Self::ArityMismatch => write!(f, "ArityMismatch"),
            Self::UnknownAttribute => write!(f, "UnknownAttribute"),
            Self::InvalidDescriptor => write!(f, "InvalidDescriptor"),
            Self::ConversionFailure => write!(f, "ConversionFailure"),
            Self::UndefinedVariable => write!(f, "UndefinedVariable"),
            Self::VariableConversion => write!(f, "VariableConversion"),
            Self::SizeResolution => write!(f, "SizeResolutionError"),
            Self::RepeatLimit => write!(f, "RepeatLimit"),
        }
    }
}

/// Errors that can occur while composing or running readers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input requested after the last line.
    #[error("Stream exhausted after line {line}")]
    StreamExhausted {
        /// Number of lines in the stream.
        line: usize,
    },

    /// Tried to move to the next line while the current one had unread tokens.
    #[error("Incomplete line read at line {line}: {remaining} unread token(s)")]
    IncompleteLineRead {
        /// Line holding the unread tokens (1-based).
        line: usize,
        /// Number of unread tokens.
        remaining: usize,
    },

    /// The stream was closed with unread non-blank lines.
    #[error("Incomplete read: {remaining} unread line(s), first at line {line}: '{content}'")]
    IncompleteRead {
        /// Number of unread non-blank lines.
        remaining: usize,
        /// First unread non-blank line (1-based).
        line: usize,
        /// Raw content of that line.
        content: String,
    },

    /// A line holds a different number of tokens than the reader expects.
    #[error("Arity mismatch: expected {expected} token(s), got {got}")]
    ArityMismatch {
        /// Tokens the reader expects.
        expected: usize,
        /// Tokens found.
        got: usize,
    },

    /// A descriptor names an attribute that is not registered on the shape.
    #[error("Unknown attribute '{attribute}' on shape {shape}")]
    UnknownAttribute {
        /// Shape name.
        shape: String,
        /// Attribute name from the descriptor.
        attribute: String,
    },

    /// A descriptor holds more than one `@`.
    #[error("Invalid descriptor '{descriptor}': at most one '@' is allowed")]
    InvalidDescriptor {
        /// Descriptor text.
        descriptor: String,
    },

    /// A token could not be converted to the requested kind.
    #[error("Cannot convert '{value}' to {kind}")]
    ConversionFailure {
        /// Requested kind.
        kind: Kind,
        /// Offending token.
        value: String,
    },

    /// A caller-supplied element converter rejected a token.
    #[error("Cannot convert '{value}': {message}")]
    CustomConversion {
        /// Offending token.
        value: String,
        /// Message returned by the converter.
        message: String,
    },

    /// A variable was looked up before being bound.
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        /// Variable name.
        name: String,
    },

    /// A variable was read as an integer but holds something else.
    #[error("Variable '{name}' is not a valid integer: '{value}'")]
    VariableConversion {
        /// Variable name.
        name: String,
        /// Bound value.
        value: String,
    },

    /// The element count of a repeated section could not be resolved.
    #[error("Cannot resolve size of '{section}' from variable '{variable}': {source}")]
    SizeResolution {
        /// Repeated section name.
        section: String,
        /// Variable the size was read from.
        variable: String,
        /// Underlying lookup failure.
        #[source]
        source: Box<ParseError>,
    },

    /// A repeated section resolved to more elements than the configured limit.
    #[error("Repeat limit exceeded in '{section}': {requested} element(s) requested, maximum {limit}")]
    RepeatLimit {
        /// Repeated section name.
        section: String,
        /// Configured maximum.
        limit: usize,
        /// Resolved element count.
        requested: usize,
    },

    /// Failure while reading one element of a repeated section.
    #[error("{source} (element {index} of '{section}')")]
    InElement {
        /// Repeated section name.
        section: String,
        /// Zero-based element index.
        index: usize,
        /// Element failure.
        #[source]
        source: Box<ParseError>,
    },

    /// Failure while reading a specific line.
    #[error("{source} at line {line}: '{content}'")]
    AtLine {
        /// Line number (1-based).
        line: usize,
        /// Raw line content.
        content: String,
        /// Line failure.
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach a line number and raw content.
    ///
    /// Errors that already carry line content are returned unchanged, so an
    /// error is enriched once no matter how many readers it passes through.
    pub fn at_line(self, line: usize, content: impl Into<String>) -> Self {
        if self.line_content().is_some() {
            return self;
        }
        Self::AtLine {
            line,
            content: content.into(),
            source: Box::new(self),
        }
    }

    /// Record the repeated section and element index a failure occurred in.
    pub fn in_element(self, section: impl Into<String>, index: usize) -> Self {
        Self::InElement {
            section: section.into(),
            index,
            source: Box::new(self),
        }
    }

    /// The failure category, looking through context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StreamExhausted { .. } => ErrorKind::StreamExhausted,
            Self::IncompleteLineRead { .. } => ErrorKind::IncompleteLineRead,
            Self::IncompleteRead { .. } => ErrorKind::IncompleteRead,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            Self::InvalidDescriptor { .. } => ErrorKind::InvalidDescriptor,
            Self::ConversionFailure { .. } | Self::CustomConversion { .. } => {
                ErrorKind::ConversionFailure
            }
            Self::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            Self::VariableConversion { .. } => ErrorKind::VariableConversion,
            Self::SizeResolution { .. } => ErrorKind::SizeResolution,
            Self::RepeatLimit { .. } => ErrorKind::RepeatLimit,
            Self::InElement { source, .. } | Self::AtLine { source, .. } => source.kind(),
        }
    }

    /// The error with all [`AtLine`](Self::AtLine) and
    /// [`InElement`](Self::InElement) layers removed.
    pub fn inner(&self) -> &ParseError {
        let mut current = self;
        while let Self::AtLine { source, .. } | Self::InElement { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Get the line number if available.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. }
            | Self::StreamExhausted { line }
            | Self::IncompleteLineRead { line, .. }
            | Self::IncompleteRead { line, .. } => Some(*line),
            Self::InElement { source, .. } => source.line(),
            _ => None,
        }
    }

    /// Raw content of the line the error was raised on, if known.
    pub fn line_content(&self) -> Option<&str> {
        match self {
            Self::AtLine { content, .. } | Self::IncompleteRead { content, .. } => Some(content),
            Self::InElement { source, .. } => source.line_content(),
            _ => None,
        }
    }
}

/// Result type for reader operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    // ==================== ErrorKind Display tests ====================

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::ArityMismatch.to_string(), "ArityMismatch");
        assert_eq!(ErrorKind::SizeResolution.to_string(), "SizeResolutionError");
        assert_eq!(ErrorKind::IncompleteRead.to_string(), "IncompleteRead");
    }

    // ==================== Line enrichment tests ====================

    #[test]
    fn test_at_line_wraps_once() {
        let err = ParseError::ArityMismatch {
            expected: 2,
            got: 3,
        }
        .at_line(4, "1 2 3")
        .at_line(9, "other");

        assert_eq!(err.line(), Some(4));
        assert_eq!(err.line_content(), Some("1 2 3"));
        match err {
            ParseError::AtLine { source, .. } => {
                assert!(matches!(*source, ParseError::ArityMismatch { .. }));
            }
            other => panic!("expected AtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_at_line_adds_content_to_incomplete_line_read() {
        let err = ParseError::IncompleteLineRead {
            line: 3,
            remaining: 1,
        }
        .at_line(3, "7 8");
        assert_eq!(err.kind(), ErrorKind::IncompleteLineRead);
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.line_content(), Some("7 8"));
    }

    #[test]
    fn test_at_line_keeps_incomplete_read_content() {
        let err = ParseError::IncompleteRead {
            remaining: 1,
            line: 2,
            content: "extra".to_string(),
        }
        .at_line(1, "x");
        assert!(matches!(err, ParseError::IncompleteRead { line: 2, .. }));
    }

    #[test]
    fn test_at_line_through_element_wrapper() {
        let err = ParseError::ArityMismatch {
            expected: 1,
            got: 2,
        }
        .at_line(5, "a b")
        .in_element("rows", 0)
        .at_line(6, "other");
        assert!(matches!(err, ParseError::InElement { .. }));
        assert_eq!(err.line(), Some(5));
        assert_eq!(err.line_content(), Some("a b"));
    }

    #[test]
    fn test_at_line_display() {
        let err = ParseError::ConversionFailure {
            kind: Kind::Int,
            value: "abc".to_string(),
        }
        .at_line(2, "abc 4");
        let msg = err.to_string();
        assert!(msg.contains("Cannot convert 'abc' to integer"));
        assert!(msg.contains("line 2"));
        assert!(msg.contains("'abc 4'"));
    }

    // ==================== Kind resolution tests ====================

    #[test]
    fn test_kind_looks_through_wrappers() {
        let err = ParseError::UndefinedVariable {
            name: "N".to_string(),
        }
        .at_line(1, "x")
        .in_element("cells", 2)
        .in_element("rows", 0);

        assert_eq!(err.kind(), ErrorKind::UndefinedVariable);
        assert_eq!(err.line(), Some(1));
        assert!(matches!(err.inner(), ParseError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_custom_conversion_kind() {
        let err = ParseError::CustomConversion {
            value: "?".to_string(),
            message: "not a cell".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ConversionFailure);
    }

    #[test]
    fn test_size_resolution_keeps_cause() {
        let err = ParseError::SizeResolution {
            section: "cells".to_string(),
            variable: "N".to_string(),
            source: Box::new(ParseError::UndefinedVariable {
                name: "N".to_string(),
            }),
        };
        assert_eq!(err.kind(), ErrorKind::SizeResolution);
        assert_eq!(err.line(), None);
        let cause = err.source().map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("Undefined variable 'N'"));
    }

    #[test]
    fn test_in_element_display() {
        let err = ParseError::ArityMismatch {
            expected: 1,
            got: 0,
        }
        .in_element("children", 1);
        assert!(err.to_string().contains("element 1 of 'children'"));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_incomplete_read_line() {
        let err = ParseError::IncompleteRead {
            remaining: 1,
            line: 2,
            content: "extra line".to_string(),
        };
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.line_content(), Some("extra line"));
        assert!(err.to_string().contains("1 unread line(s)"));
    }
}
