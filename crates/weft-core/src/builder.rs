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

//! Fluent composition of object readers.
//!
//! A [`ReaderBuilder`] is bound to one [`Shape`] and accumulates section
//! readers in declaration order. Each call appends one section and hands the
//! builder back; [`ReaderBuilder::build`] yields the immutable
//! [`ObjectReader`].
//!
//! Attribute names are resolved against the shape as sections are added. The
//! first failure is kept and reported by `build`, so a whole chain can be
//! written without intermediate `?`.
//!
//! # Examples
//!
//! ```
//! use weft_core::{parse, ReaderBuilder, Shape};
//!
//! #[derive(Default)]
//! struct Listing {
//!     n: i32,
//!     items: Vec<String>,
//! }
//!
//! let shape = Shape::new("Listing").attr("n", |l: &mut Listing, v: i32| l.n = v);
//! let reader = ReaderBuilder::new(shape)
//!     .fields(&["n"])
//!     .array("items", |l: &mut Listing, v: Vec<String>| l.items = v)
//!     .build()
//!     .unwrap();
//!
//! let listing = parse(&reader, "3\na b c").unwrap();
//! assert_eq!(listing.n, 3);
//! assert_eq!(listing.items, ["a", "b", "c"]);
//! ```

use crate::context::Context;
use crate::convert::{FromToken, FromTokens};
use crate::error::{ParseError, ParseResult};
use crate::reader::{
    Construct, Descriptor, ElementsLine, FieldsLine, Nested, ObjectReader, Repeat, Section, Size,
};
use crate::shape::Shape;
use std::sync::Arc;
use tracing::debug;

/// Accumulates section readers for one shape.
#[derive(Debug)]
pub struct ReaderBuilder<T> {
    shape: Shape<T>,
    construct: Construct<T>,
    sections: Vec<Section<T>>,
    error: Option<ParseError>,
}

impl<T: Default + 'static> ReaderBuilder<T> {
    /// Start a reader whose value is created with `T::default()`.
    pub fn new(shape: Shape<T>) -> Self {
        Self::with_constructor(shape, T::default)
    }
}

impl<T: 'static> ReaderBuilder<T> {
    /// Start a reader with a zero-argument constructor.
    pub fn with_constructor<F>(shape: Shape<T>, constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::start(shape, Construct::empty(constructor))
    }

    /// Start a reader whose constructor takes the next `A::ARITY` tokens,
    /// wherever they fall in the stream.
    pub fn from_tokens<A, F>(shape: Shape<T>, constructor: F) -> Self
    where
        A: FromTokens,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::start(shape, Construct::tokens(constructor))
    }

    /// Start a reader whose constructor takes one whole line holding exactly
    /// `A::ARITY` tokens.
    ///
    /// ```
    /// use weft_core::{parse, ReaderBuilder, Shape};
    ///
    /// struct Edge(u32, u32);
    ///
    /// let reader = ReaderBuilder::from_line(Shape::new("Edge"), |(a, b): (u32, u32)| Edge(a, b))
    ///     .build()
    ///     .unwrap();
    /// let edge = parse(&reader, "1 2").unwrap();
    /// assert_eq!((edge.0, edge.1), (1, 2));
    /// ```
    pub fn from_line<A, F>(shape: Shape<T>, constructor: F) -> Self
    where
        A: FromTokens,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self::start(shape, Construct::line(constructor))
    }

    fn start(shape: Shape<T>, construct: Construct<T>) -> Self {
        Self {
            shape,
            construct,
            sections: Vec::new(),
            error: None,
        }
    }

    /// Append a fields-and-variables line.
    ///
    /// Each descriptor is `attr`, `@var`, `attr@var`, or empty to discard the
    /// token at that position.
    pub fn fields(self, descriptors: &[&str]) -> Self {
        let descriptors = descriptors.iter().copied().map(Descriptor::parse).collect();
        self.fields_from(descriptors)
    }

    /// Append a line whose tokens are bound to variables only.
    pub fn variables(self, names: &[&str]) -> Self {
        let descriptors = names.iter().copied().map(Descriptor::variable).collect();
        self.fields_from(descriptors)
    }

    fn fields_from(mut self, descriptors: Vec<Descriptor>) -> Self {
        if self.error.is_none() {
            match FieldsLine::resolve(&self.shape, descriptors) {
                Ok(fields) => self.sections.push(Section::Fields(fields)),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Append a step that consumes one line and ignores its tokens.
    pub fn skip_line(self) -> Self {
        self.section("skip", |ctx: &mut Context, _: &mut T| {
            ctx.next_line()?;
            Ok(())
        })
    }

    /// Append a line of elements of one scalar type.
    pub fn array<E, F>(self, name: &str, setter: F) -> Self
    where
        E: FromToken,
        F: Fn(&mut T, Vec<E>) + Send + Sync + 'static,
    {
        self.push(Section::Elements(ElementsLine::primitive(name.to_string(), None, setter)))
    }

    /// Append a line of elements whose count must match `len`.
    pub fn array_sized<E, F>(self, name: &str, len: impl Into<Size<T>>, setter: F) -> Self
    where
        E: FromToken,
        F: Fn(&mut T, Vec<E>) + Send + Sync + 'static,
    {
        let elements = ElementsLine::primitive(name.to_string(), Some(len.into()), setter);
        self.push(Section::Elements(elements))
    }

    /// Append a line of elements converted by `convert`.
    pub fn array_with<E, C, F>(self, name: &str, convert: C, setter: F) -> Self
    where
        E: 'static,
        C: Fn(&str) -> Result<E, String> + Send + Sync + 'static,
        F: Fn(&mut T, Vec<E>) + Send + Sync + 'static,
    {
        self.push(Section::Elements(ElementsLine::custom(name.to_string(), convert, setter)))
    }

    /// Append `size` consecutive objects read by `reader`.
    pub fn repeat<U, F>(
        self,
        name: &str,
        size: impl Into<Size<T>>,
        reader: ObjectReader<U>,
        setter: F,
    ) -> Self
    where
        U: 'static,
        F: Fn(&mut T, Vec<U>) + Send + Sync + 'static,
    {
        self.push(Section::Repeat(Repeat::new(name.to_string(), size.into(), reader, setter)))
    }

    /// Append one nested object read by `reader`.
    pub fn object<U, F>(self, name: &str, reader: ObjectReader<U>, setter: F) -> Self
    where
        U: 'static,
        F: Fn(&mut T, U) + Send + Sync + 'static,
    {
        self.push(Section::Object(Nested::new(name.to_string(), reader, setter)))
    }

    /// Append a caller-supplied step.
    ///
    /// Errors returned by `step` propagate as-is; use
    /// [`Context::at_current_line`] to attach the line.
    pub fn section<F>(self, name: &str, step: F) -> Self
    where
        F: Fn(&mut Context, &mut T) -> ParseResult<()> + Send + Sync + 'static,
    {
        self.push(Section::Custom {
            name: name.to_string(),
            step: Arc::new(step),
        })
    }

    fn push(mut self, section: Section<T>) -> Self {
        self.sections.push(section);
        self
    }
}

impl<T> ReaderBuilder<T> {
    /// Shape the builder is bound to.
    #[inline]
    pub fn shape(&self) -> &Shape<T> {
        &self.shape
    }

    /// Number of sections added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections have been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Finish the reader, or return the first composition error.
    pub fn build(self) -> ParseResult<ObjectReader<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        debug!(shape = self.shape.name(), sections = self.sections.len(), "built reader");
        Ok(ObjectReader::from_parts(
            self.shape.name().to_string(),
            self.construct,
            self.sections,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug, Default, PartialEq)]
    struct Grid {
        rows: i64,
        cols: i64,
        cells: Vec<Vec<char>>,
        label: String,
    }

    fn shape() -> Shape<Grid> {
        Shape::new("Grid")
            .attr("rows", |g: &mut Grid, v: i64| g.rows = v)
            .attr("cols", |g: &mut Grid, v: i64| g.cols = v)
            .attr("label", |g: &mut Grid, v: String| g.label = v)
    }

    fn row_reader() -> ObjectReader<Vec<char>> {
        ReaderBuilder::with_constructor(Shape::new("Row"), Vec::new)
            .array("cells", |row: &mut Vec<char>, v: Vec<char>| *row = v)
            .build()
            .unwrap()
    }

    // ==================== Composition tests ====================

    #[test]
    fn test_sections_run_in_declaration_order() {
        let reader = ReaderBuilder::new(shape())
            .fields(&["rows", "cols"])
            .repeat("cells", Size::from_parent(|g: &Grid| g.rows as usize), row_reader(), |g, v| {
                g.cells = v
            })
            .fields(&["label"])
            .build()
            .unwrap();
        assert_eq!(reader.sections().len(), 3);
        assert_eq!(reader.shape_name(), "Grid");

        let mut ctx = Context::from_text("2 3\na b c\nd e f\ndone");
        let grid = reader.read(&mut ctx).unwrap();
        ctx.close().unwrap();
        assert_eq!(grid.cells, vec![vec!['a', 'b', 'c'], vec!['d', 'e', 'f']]);
        assert_eq!(grid.label, "done");
    }

    #[test]
    fn test_unknown_attribute_reported_at_build() {
        let err = ReaderBuilder::new(shape())
            .fields(&["rows", "depth"])
            .fields(&["nope"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownAttribute {
                shape: "Grid".to_string(),
                attribute: "depth".to_string(),
            }
        );
    }

    #[test]
    fn test_variables_and_sized_array() {
        let reader = ReaderBuilder::new(shape())
            .variables(&["n"])
            .array_sized("cells", Size::variable("n"), |g: &mut Grid, v: Vec<char>| {
                g.cells = vec![v]
            })
            .build()
            .unwrap();

        let mut ctx = Context::from_text("2\nx y");
        assert_eq!(reader.read(&mut ctx).unwrap().cells, vec![vec!['x', 'y']]);
        assert_eq!(ctx.variable("n").unwrap(), "2");

        let mut ctx = Context::from_text("3\nx y");
        let err = reader.read(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_skip_line() {
        let reader = ReaderBuilder::new(shape())
            .skip_line()
            .fields(&["label"])
            .build()
            .unwrap();
        let mut ctx = Context::from_text("ignored 1 2 3\nkept");
        assert_eq!(reader.read(&mut ctx).unwrap().label, "kept");
    }

    #[test]
    fn test_array_with_custom_conversion() {
        let reader = ReaderBuilder::new(shape())
            .array_with(
                "cells",
                |t: &str| t.parse::<char>().map_err(|e| e.to_string()),
                |g: &mut Grid, v: Vec<char>| g.cells = vec![v],
            )
            .build()
            .unwrap();

        let mut ctx = Context::from_text("# .");
        assert_eq!(reader.read(&mut ctx).unwrap().cells, vec![vec!['#', '.']]);

        let mut ctx = Context::from_text("# ..");
        let err = reader.read(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailure);
        assert_eq!(err.line_content(), Some("# .."));
    }

    // ==================== Constructor tests ====================

    #[test]
    fn test_from_tokens_then_sections() {
        let reader = ReaderBuilder::from_tokens(shape(), |(rows, cols): (i64, i64)| Grid {
            rows,
            cols,
            ..Grid::default()
        })
        .fields(&["label"])
        .build()
        .unwrap();

        let mut ctx = Context::from_text("4\n5\nname");
        let grid = reader.read(&mut ctx).unwrap();
        assert_eq!((grid.rows, grid.cols, grid.label.as_str()), (4, 5, "name"));
    }

    #[test]
    fn test_object_and_custom_section() {
        let reader = ReaderBuilder::new(shape())
            .object("cells", row_reader(), |g: &mut Grid, row| g.cells.push(row))
            .section("count", |ctx: &mut Context, g: &mut Grid| {
                g.rows = ctx.next_token()?.len() as i64;
                Ok(())
            })
            .build()
            .unwrap();

        let mut ctx = Context::from_text("a b\nxyz");
        let grid = reader.read(&mut ctx).unwrap();
        assert_eq!(grid.cells, vec![vec!['a', 'b']]);
        assert_eq!(grid.rows, 3);
    }

    #[test]
    fn test_builder_len() {
        let builder = ReaderBuilder::new(shape());
        assert!(builder.is_empty());
        let builder = builder.skip_line().fields(&[""]);
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.shape().name(), "Grid");
    }
}
