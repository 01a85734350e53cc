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

//! Typed Readers for Line-Oriented Text
//!
//! This crate turns line-oriented, delimiter-separated text (the kind of input
//! programming puzzles ship with) into typed Rust values. Instead of writing a
//! hand-rolled parser per input format, you declare the layout as a pipeline
//! of small readers, each consuming one section of the input.
//!
//! # Features
//!
//! - **Declarative**: describe a layout with a fluent [`ReaderBuilder`]
//! - **Typed**: tokens convert through [`FromToken`]; attributes are
//!   registered on a [`Shape`] with their declared type
//! - **Strict**: leftover tokens or lines are errors, and every line-scoped
//!   error carries the line number and raw content
//! - **Composable**: readers nest to any depth, and a repeated section can be
//!   sized by a constant, by the parent value, or by a variable bound earlier
//!   in the stream
//! - **Shareable**: built readers are immutable and `Send + Sync`
//!
//! # Quick Start
//!
//! ```rust
//! use weft_core::{parse, ObjectReader, ReaderBuilder, Shape, Size};
//!
//! #[derive(Debug, Default)]
//! struct Child {
//!     k: i32,
//!     v: Vec<i64>,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Family {
//!     children: Vec<Child>,
//! }
//!
//! let child = ReaderBuilder::new(Shape::new("Child").attr("k", |c: &mut Child, k: i32| c.k = k))
//!     .fields(&["k@k"])
//!     .array_sized("v", Size::variable("k"), |c: &mut Child, v: Vec<i64>| c.v = v)
//!     .build()
//!     .unwrap();
//!
//! let family = ReaderBuilder::new(Shape::new("Family"))
//!     .variables(&["count"])
//!     .repeat("children", Size::variable("count"), child, |f: &mut Family, c| f.children = c)
//!     .build()
//!     .unwrap();
//!
//! let parsed = parse(&family, "2\n2\n10 20\n1\n30").unwrap();
//! assert_eq!(parsed.children[0].v, [10, 20]);
//! assert_eq!(parsed.children[1].k, 1);
//!
//! // One value per line
//! let values = ObjectReader::<f64>::value();
//! assert_eq!(parse(&values, "2.5").unwrap(), 2.5);
//! ```
//!
//! # Errors
//!
//! Every failure is a [`ParseError`]. Use [`ParseError::kind`] to match on the
//! category regardless of the line/element context wrapped around it:
//!
//! ```rust
//! use weft_core::{parse, ErrorKind, ReaderBuilder, Shape};
//!
//! #[derive(Debug, Default)]
//! struct Pair {
//!     a: i32,
//!     b: i32,
//! }
//!
//! let shape = Shape::new("Pair")
//!     .attr("a", |p: &mut Pair, v: i32| p.a = v)
//!     .attr("b", |p: &mut Pair, v: i32| p.b = v);
//! let reader = ReaderBuilder::new(shape).fields(&["a", "b"]).build().unwrap();
//!
//! let err = parse(&reader, "1 2 3").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ArityMismatch);
//! assert_eq!(err.line(), Some(1));
//! assert_eq!(err.line_content(), Some("1 2 3"));
//! ```

mod builder;
mod config;
mod context;
mod convert;
mod error;
mod parser;
mod shape;

pub mod reader;

pub use builder::ReaderBuilder;
pub use config::{Delimiter, ParseConfig, DEFAULT_MAX_REPEAT};
pub use context::Context;
pub use convert::{convert, FromToken, FromTokens, Kind, Value};
pub use error::{ErrorKind, ParseError, ParseResult};
pub use parser::{parse, parse_lines, Parser};
pub use reader::{ObjectReader, Section, Size};
pub use shape::{Attribute, Shape};
