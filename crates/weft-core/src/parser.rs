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

//! Root parse entry points.
//!
//! A parse creates a fresh [`Context`] over the input lines, runs the root
//! reader, then closes the context. Input left unread after the root reader
//! finishes is an error ([`ParseError::IncompleteRead`]); a parse returns
//! either a fully populated value or one error, never a partial result.

use crate::config::ParseConfig;
use crate::context::Context;
use crate::error::ParseResult;
use crate::reader::ObjectReader;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// A root reader bundled with its parse configuration.
///
/// # Examples
///
/// ```
/// use weft_core::{Delimiter, ParseConfig, Parser, ReaderBuilder, Shape};
///
/// let reader = ReaderBuilder::with_constructor(Shape::new("Row"), Vec::new)
///     .array("row", |r: &mut Vec<i64>, v: Vec<i64>| *r = v)
///     .build()
///     .unwrap();
/// let config = ParseConfig {
///     delimiter: Delimiter::Char(','),
///     ..ParseConfig::default()
/// };
///
/// let parser = Parser::with_config(reader, config);
/// assert_eq!(parser.parse_str("1,2,3").unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct Parser<T> {
    reader: ObjectReader<T>,
    config: ParseConfig,
}

impl<T> Parser<T> {
    /// Parser with the default configuration.
    pub fn new(reader: ObjectReader<T>) -> Self {
        Self::with_config(reader, ParseConfig::default())
    }

    /// Parser with an explicit configuration.
    pub fn with_config(reader: ObjectReader<T>, config: ParseConfig) -> Self {
        Self { reader, config }
    }

    /// Configuration used for every parse.
    #[inline]
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Root reader.
    #[inline]
    pub fn reader(&self) -> &ObjectReader<T> {
        &self.reader
    }

    /// Parse text, splitting it into lines.
    pub fn parse_str(&self, input: &str) -> ParseResult<T> {
        self.parse_lines(input.lines())
    }

    /// Parse a sequence of lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ctx = self.context(lines);
        self.run(&mut ctx)
    }

    /// Parse text and return the variable bindings alongside the value.
    pub fn parse_with_variables(&self, input: &str) -> ParseResult<(T, HashMap<String, String>)> {
        let mut ctx = self.context(input.lines());
        let value = self.run(&mut ctx)?;
        Ok((value, ctx.into_variables()))
    }

    fn context<I, S>(&self, lines: I) -> Context
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        Context::with_config(lines, self.config.clone())
    }

    fn run(&self, ctx: &mut Context) -> ParseResult<T> {
        let start = Instant::now();
        let result = self.reader.read(ctx).and_then(|value| {
            ctx.close().map_err(|e| ctx.at_current_line(e))?;
            Ok(value)
        });
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(_) => debug!(
                target: "weft_core::parse",
                shape = self.reader.shape_name(),
                lines = ctx.line_count(),
                duration_ms,
                status = "success",
                "parse completed"
            ),
            Err(err) => debug!(
                target: "weft_core::parse",
                shape = self.reader.shape_name(),
                lines = ctx.line_count(),
                error_kind = %err.kind(),
                line = ?err.line(),
                status = "failure",
                "parse failed"
            ),
        }
        result
    }
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            config: self.config.clone(),
        }
    }
}

/// Parse text with `reader` and the default configuration.
pub fn parse<T>(reader: &ObjectReader<T>, input: &str) -> ParseResult<T> {
    parse_lines(reader, input.lines())
}

/// Parse a sequence of lines with `reader` and the default configuration.
pub fn parse_lines<T, I, S>(reader: &ObjectReader<T>, lines: I) -> ParseResult<T>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Parser::new(reader.clone()).parse_lines(lines)
}
