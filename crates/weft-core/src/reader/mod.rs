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

//! Composable readers.
//!
//! An [`ObjectReader`] builds one value of type `T` from the token stream in
//! two phases:
//!
//! 1. a [`Construct`] step creates the value, optionally consuming tokens for
//!    constructor arguments;
//! 2. each [`Section`] runs against the new value in declaration order,
//!    consuming as much of the stream as it needs.
//!
//! Sections may themselves hold object readers (nested objects and repeated
//! sections), so a composed reader is a recursive-descent parser whose grammar
//! is exactly the pipeline it was built from. Readers are immutable once built
//! and can be shared across threads; all parse state lives in the
//! [`Context`].
//!
//! Readers are normally assembled with [`ReaderBuilder`](crate::ReaderBuilder).

mod line;
mod repeat;

pub use line::{Descriptor, ElementsLine, FieldsLine};
pub use repeat::{Nested, Repeat, Size};

use crate::context::Context;
use crate::convert::{FromToken, FromTokens};
use crate::error::ParseResult;
use std::fmt;
use std::sync::Arc;

/// Run a line-scoped read, enriching any failure with the current line.
pub(crate) fn line_scoped<R>(
    ctx: &mut Context,
    read: impl FnOnce(&mut Context) -> ParseResult<R>,
) -> ParseResult<R> {
    let result = read(ctx);
    result.map_err(|e| ctx.at_current_line(e))
}

type Build<T> = Arc<dyn Fn(&[String]) -> ParseResult<T> + Send + Sync>;
type Step<T> = Arc<dyn Fn(&mut Context, &mut T) -> ParseResult<()> + Send + Sync>;

/// How an object reader creates its value.
pub enum Construct<T> {
    /// Zero-argument constructor; consumes nothing.
    Empty(Arc<dyn Fn() -> T + Send + Sync>),
    /// Fixed-arity constructor reading the next `arity` tokens, wherever they
    /// fall in the stream.
    Tokens {
        /// Number of tokens consumed.
        arity: usize,
        /// Constructor callback.
        build: Build<T>,
    },
    /// Fixed-arity constructor reading one whole line of exactly `arity`
    /// tokens.
    Line {
        /// Number of tokens the line must hold.
        arity: usize,
        /// Constructor callback.
        build: Build<T>,
    },
}

impl<T: 'static> Construct<T> {
    /// Zero-argument constructor.
    pub fn empty<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Empty(Arc::new(f))
    }

    /// Constructor over the next `A::ARITY` tokens.
    pub fn tokens<A, F>(f: F) -> Self
    where
        A: FromTokens,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::Tokens {
            arity: A::ARITY,
            build: Arc::new(move |tokens: &[String]| A::from_tokens(tokens).map(&f)),
        }
    }

    /// Constructor over one line of exactly `A::ARITY` tokens.
    pub fn line<A, F>(f: F) -> Self
    where
        A: FromTokens,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::Line {
            arity: A::ARITY,
            build: Arc::new(move |tokens: &[String]| A::from_tokens(tokens).map(&f)),
        }
    }
}

impl<T> Construct<T> {
    fn run(&self, ctx: &mut Context) -> ParseResult<T> {
        match self {
            Self::Empty(f) => Ok(f()),
            Self::Tokens { arity, build } => line_scoped(ctx, |ctx| {
                let tokens = (0..*arity)
                    .map(|_| ctx.next_token())
                    .collect::<ParseResult<Vec<_>>>()?;
                build(&tokens)
            }),
            Self::Line { build, .. } => line_scoped(ctx, |ctx| {
                let tokens = ctx.next_line()?;
                build(&tokens)
            }),
        }
    }
}

impl<T> Clone for Construct<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty(f) => Self::Empty(Arc::clone(f)),
            Self::Tokens { arity, build } => Self::Tokens {
                arity: *arity,
                build: Arc::clone(build),
            },
            Self::Line { arity, build } => Self::Line {
                arity: *arity,
                build: Arc::clone(build),
            },
        }
    }
}

impl<T> fmt::Debug for Construct<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(_) => f.write_str("Empty"),
            Self::Tokens { arity, .. } => f.debug_struct("Tokens").field("arity", arity).finish(),
            Self::Line { arity, .. } => f.debug_struct("Line").field("arity", arity).finish(),
        }
    }
}

/// One step of an object reader.
pub enum Section<T> {
    /// Attributes and variables from one line.
    Fields(FieldsLine<T>),
    /// One line of same-typed elements.
    Elements(ElementsLine<T>),
    /// N nested objects.
    Repeat(Repeat<T>),
    /// One nested object.
    Object(Nested<T>),
    /// Caller-supplied step.
    Custom {
        /// Step name.
        name: String,
        /// Step body.
        step: Step<T>,
    },
}

impl<T> Section<T> {
    /// Short description for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Self::Fields(_) => "fields",
            Self::Elements(e) => e.name(),
            Self::Repeat(r) => r.name(),
            Self::Object(o) => o.name(),
            Self::Custom { name, .. } => name,
        }
    }

    /// Run this section against `target`.
    pub fn apply(&self, ctx: &mut Context, target: &mut T) -> ParseResult<()> {
        match self {
            Self::Fields(fields) => fields.read(ctx, target),
            Self::Elements(elements) => elements.read(ctx, target),
            Self::Repeat(repeat) => repeat.read(ctx, target),
            Self::Object(nested) => nested.read(ctx, target),
            Self::Custom { step, .. } => step(ctx, target),
        }
    }
}

impl<T> fmt::Debug for Section<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields(fields) => fields.fmt(f),
            Self::Elements(elements) => elements.fmt(f),
            Self::Repeat(repeat) => repeat.fmt(f),
            Self::Object(nested) => nested.fmt(f),
            Self::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
        }
    }
}

/// A composed, immutable reader producing values of type `T`.
///
/// Cloning is cheap: sections are shared.
pub struct ObjectReader<T> {
    shape: String,
    construct: Construct<T>,
    sections: Arc<[Section<T>]>,
}

impl<T> ObjectReader<T> {
    pub(crate) fn from_parts(
        shape: String,
        construct: Construct<T>,
        sections: Vec<Section<T>>,
    ) -> Self {
        Self {
            shape,
            construct,
            sections: sections.into(),
        }
    }

    /// Construct the value, then run every section in order.
    pub fn read(&self, ctx: &mut Context) -> ParseResult<T> {
        let mut target = self.construct.run(ctx)?;
        for section in self.sections.iter() {
            section.apply(ctx, &mut target)?;
        }
        Ok(target)
    }

    /// Name of the shape this reader populates.
    #[inline]
    pub fn shape_name(&self) -> &str {
        &self.shape
    }

    /// Constructor step.
    #[inline]
    pub fn construct(&self) -> &Construct<T> {
        &self.construct
    }

    /// Sections in execution order.
    #[inline]
    pub fn sections(&self) -> &[Section<T>] {
        &self.sections
    }
}

impl<V: FromToken> ObjectReader<V> {
    /// Reader for one line holding exactly one token, converted as `V`.
    ///
    /// ```
    /// use weft_core::{parse, ObjectReader};
    ///
    /// let reader = ObjectReader::<i64>::value();
    /// assert_eq!(parse(&reader, "42").unwrap(), 42);
    /// assert!(parse(&reader, "4 2").is_err());
    /// ```
    pub fn value() -> Self {
        Self::from_parts(
            std::any::type_name::<V>().to_string(),
            Construct::line(|(value,): (V,)| value),
            Vec::new(),
        )
    }
}

impl<T> Clone for ObjectReader<T> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            construct: self.construct.clone(),
            sections: Arc::clone(&self.sections),
        }
    }
}

impl<T> fmt::Debug for ObjectReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectReader")
            .field("shape", &self.shape)
            .field("construct", &self.construct)
            .field("sections", &self.sections)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ParseError};

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    // ==================== Construct tests ====================

    #[test]
    fn test_construct_tokens_across_lines() {
        let construct = Construct::tokens(|(x, y): (i64, i64)| Point { x, y });
        let mut ctx = Context::from_text("3\n4");
        assert_eq!(construct.run(&mut ctx).unwrap(), Point { x: 3, y: 4 });
        ctx.close().unwrap();
    }

    #[test]
    fn test_construct_tokens_leaves_rest_of_line() {
        let construct = Construct::tokens(|(x, y): (i64, i64)| Point { x, y });
        let mut ctx = Context::from_text("3 4 5");
        construct.run(&mut ctx).unwrap();
        assert_eq!(ctx.remaining_tokens(), 1);
        assert_eq!(ctx.next_line().unwrap_err().kind(), ErrorKind::IncompleteLineRead);
    }

    #[test]
    fn test_construct_line_arity() {
        let construct = Construct::line(|(x, y): (i64, i64)| Point { x, y });
        let mut ctx = Context::from_text("3 4 5");
        let err = construct.run(&mut ctx).unwrap_err();
        assert_eq!(err.inner(), &ParseError::ArityMismatch { expected: 2, got: 3 });
        assert_eq!(err.line_content(), Some("3 4 5"));
    }

    // ==================== Object reader tests ====================

    #[test]
    fn test_value_reader() {
        let reader = ObjectReader::<char>::value();
        let mut ctx = Context::from_text("#");
        assert_eq!(reader.read(&mut ctx).unwrap(), '#');
        assert!(reader.sections().is_empty());
    }

    #[test]
    fn test_custom_section_runs_in_order() {
        let step: Step<Vec<String>> = Arc::new(|ctx: &mut Context, target: &mut Vec<String>| {
            target.push(ctx.next_token()?);
            Ok(())
        });
        let sections = vec![
            Section::Custom {
                name: "first".to_string(),
                step: Arc::clone(&step),
            },
            Section::Custom {
                name: "second".to_string(),
                step,
            },
        ];
        let reader = ObjectReader::from_parts(
            "Words".to_string(),
            Construct::empty(Vec::new),
            sections,
        );

        let mut ctx = Context::from_text("a\nb");
        assert_eq!(reader.read(&mut ctx).unwrap(), vec!["a", "b"]);
        assert_eq!(reader.sections()[1].name(), "second");
    }

    #[test]
    fn test_reader_is_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<ObjectReader<Point>>();
        assert_send_sync::<ObjectReader<std::rc::Rc<u8>>>();
    }
}
