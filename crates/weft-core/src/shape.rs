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

//! Target shapes: named, typed attribute setters.
//!
//! A [`Shape`] describes how tokens are assigned to a target type by name.
//! It is a registry of setter closures built once, before parsing: each
//! attribute has a name, the [`Kind`] its token is converted as, and a closure
//! that stores the converted value on the target.
//!
//! ```rust
//! use weft_core::Shape;
//!
//! #[derive(Default)]
//! struct Edge {
//!     from: usize,
//!     to: usize,
//!     weight: f64,
//! }
//!
//! let shape = Shape::<Edge>::new("Edge")
//!     .attr("from", |e: &mut Edge, v| e.from = v)
//!     .attr("to", |e: &mut Edge, v| e.to = v)
//!     .attr("weight", |e: &mut Edge, v| e.weight = v);
//!
//! let mut edge = Edge::default();
//! shape.resolve("weight").unwrap().assign(&mut edge, "2.5").unwrap();
//! assert_eq!(edge.weight, 2.5);
//! ```

use crate::convert::{FromToken, Kind};
use crate::error::{ParseError, ParseResult};
use std::fmt;
use std::sync::Arc;

type Setter<T> = Arc<dyn Fn(&mut T, &str) -> ParseResult<()> + Send + Sync>;

/// One named attribute of a shape.
pub struct Attribute<T> {
    name: String,
    kind: Kind,
    set: Setter<T>,
}

impl<T> Attribute<T> {
    /// Attribute name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind the token is converted as.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Convert a token and store it on the target.
    pub fn assign(&self, target: &mut T, token: &str) -> ParseResult<()> {
        (self.set)(target, token)
    }
}

impl<T> Clone for Attribute<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            set: Arc::clone(&self.set),
        }
    }
}

impl<T> fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Named attribute registry for a target type.
pub struct Shape<T> {
    name: String,
    attributes: Vec<Attribute<T>>,
}

impl<T: 'static> Shape<T> {
    /// Create an empty shape.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Register an attribute. The token kind follows from `V`.
    ///
    /// Registering a name twice replaces the earlier setter.
    pub fn attr<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: FromToken,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let attribute = Attribute {
            name: name.into(),
            kind: V::KIND,
            set: Arc::new(move |target: &mut T, token: &str| {
                setter(target, V::from_token(token)?);
                Ok(())
            }),
        };

        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }
}

impl<T> Shape<T> {
    /// Shape name, used in diagnostics.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<T>> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up an attribute, failing with [`ParseError::UnknownAttribute`].
    pub fn resolve(&self, name: &str) -> ParseResult<Attribute<T>> {
        self.attribute(name)
            .cloned()
            .ok_or_else(|| ParseError::UnknownAttribute {
                shape: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// Registered attributes in registration order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute<T>> {
        self.attributes.iter()
    }

    /// Number of registered attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attributes are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<T> Clone for Shape<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<T> fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}
