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

//! Repeated sections and nested objects.
//!
//! A repeated section resolves an element count N, runs a nested
//! [`ObjectReader`] N times in stream order and hands the collected elements to
//! the parent. The count comes from one of three [`Size`] strategies chosen
//! when the reader is built:
//!
//! - [`Size::fixed`]: a constant;
//! - [`Size::from_parent`]: computed from the partly populated parent;
//! - [`Size::variable`]: a variable bound earlier in the stream. This is the
//!   usual "announce the count now, read the records later" layout.

use super::ObjectReader;
use crate::context::Context;
use crate::error::{ParseError, ParseResult};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Upper bound on the capacity reserved before elements are read.
const PREALLOCATE_LIMIT: usize = 4096;

/// Where a repeated section gets its element count from.
pub enum Size<T> {
    /// Constant count.
    Fixed(usize),
    /// Count computed from the parent.
    Derived(Arc<dyn Fn(&T) -> usize + Send + Sync>),
    /// Count read from a bound variable.
    Variable(String),
}

impl<T> Size<T> {
    /// Constant count.
    pub fn fixed(count: usize) -> Self {
        Self::Fixed(count)
    }

    /// Count computed from the parent object as populated so far.
    pub fn from_parent<F>(f: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// Count read from a variable at the moment the section starts.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Resolve the count for `section`.
    ///
    /// A variable that is undefined, not an integer, or negative fails with
    /// [`ParseError::SizeResolution`], keeping the lookup failure as its cause.
    pub fn resolve(&self, ctx: &Context, parent: &T, section: &str) -> ParseResult<usize> {
        match self {
            Self::Fixed(count) => Ok(*count),
            Self::Derived(f) => Ok(f(parent)),
            Self::Variable(name) => {
                let failed = |source: ParseError| ParseError::SizeResolution {
                    section: section.to_string(),
                    variable: name.clone(),
                    source: Box::new(source),
                };

                let value = ctx.variable_as_int(name).map_err(failed)?;
                usize::try_from(value).map_err(|_| {
                    failed(ParseError::VariableConversion {
                        name: name.clone(),
                        value: value.to_string(),
                    })
                })
            }
        }
    }
}

impl<T> Clone for Size<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(count) => Self::Fixed(*count),
            Self::Derived(f) => Self::Derived(Arc::clone(f)),
            Self::Variable(name) => Self::Variable(name.clone()),
        }
    }
}

impl<T> fmt::Debug for Size<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(count) => f.debug_tuple("Fixed").field(count).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
            Self::Variable(name) => f.debug_tuple("Variable").field(name).finish(),
        }
    }
}

impl<T> From<usize> for Size<T> {
    fn from(count: usize) -> Self {
        Self::Fixed(count)
    }
}

type RunElements<T> = Arc<dyn Fn(&mut Context, &mut T, usize) -> ParseResult<()> + Send + Sync>;

/// A homogeneous repeated section.
pub struct Repeat<T> {
    name: String,
    size: Size<T>,
    run: RunElements<T>,
}

impl<T: 'static> Repeat<T> {
    pub(crate) fn new<U, F>(
        name: String,
        size: Size<T>,
        reader: ObjectReader<U>,
        setter: F,
    ) -> Self
    where
        U: 'static,
        F: Fn(&mut T, Vec<U>) + Send + Sync + 'static,
    {
        let section = name.clone();
        Self {
            name,
            size,
            run: Arc::new(move |ctx: &mut Context, target: &mut T, count: usize| {
                let mut items = Vec::with_capacity(count.min(PREALLOCATE_LIMIT));
                for index in 0..count {
                    let item = reader
                        .read(ctx)
                        .map_err(|e| e.in_element(section.as_str(), index))?;
                    items.push(item);
                }
                setter(target, items);
                Ok(())
            }),
        }
    }
}

impl<T> Repeat<T> {
    /// Destination name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size strategy.
    #[inline]
    pub fn size(&self) -> &Size<T> {
        &self.size
    }

    pub(crate) fn read(&self, ctx: &mut Context, target: &mut T) -> ParseResult<()> {
        let count = self.size.resolve(ctx, target, &self.name)?;
        let limit = ctx.config().max_repeat;
        if count > limit {
            return Err(ParseError::RepeatLimit {
                section: self.name.clone(),
                limit,
                requested: count,
            });
        }

        trace!(section = %self.name, count, "reading repeated section");
        (self.run)(ctx, target, count)
    }
}

impl<T> fmt::Debug for Repeat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repeat")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

type RunNested<T> = Arc<dyn Fn(&mut Context, &mut T) -> ParseResult<()> + Send + Sync>;

/// A single nested object assigned to the parent.
pub struct Nested<T> {
    name: String,
    run: RunNested<T>,
}

impl<T: 'static> Nested<T> {
    pub(crate) fn new<U, F>(name: String, reader: ObjectReader<U>, setter: F) -> Self
    where
        U: 'static,
        F: Fn(&mut T, U) + Send + Sync + 'static,
    {
        Self {
            name,
            run: Arc::new(move |ctx: &mut Context, target: &mut T| {
                setter(target, reader.read(ctx)?);
                Ok(())
            }),
        }
    }
}

impl<T> Nested<T> {
    /// Destination name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn read(&self, ctx: &mut Context, target: &mut T) -> ParseResult<()> {
        (self.run)(ctx, target)
    }
}

impl<T> fmt::Debug for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nested").field("name", &self.name).finish()
    }
}
