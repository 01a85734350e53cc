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

//! Readers that consume exactly one line.

use super::{line_scoped, Size};
use crate::context::Context;
use crate::convert::FromToken;
use crate::error::{ParseError, ParseResult};
use crate::shape::{Attribute, Shape};
use std::fmt;
use std::sync::Arc;

/// One position of a fields line: an attribute, a variable, both, or neither.
///
/// | Syntax | Effect |
/// |--------|--------|
/// | `attr` | convert and assign to `attr` |
/// | `@var` | bind the raw token to `var` |
/// | `attr@var` | both |
/// | `""` | discard the token |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Attribute to assign, if any.
    pub attribute: Option<String>,
    /// Variable to bind, if any.
    pub variable: Option<String>,
}

impl Descriptor {
    /// Parse descriptor syntax. Everything after the first `@` is the
    /// variable name; a second `@` is rejected when the descriptor is resolved
    /// against a shape.
    ///
    /// ```
    /// use weft_core::reader::Descriptor;
    ///
    /// let d = Descriptor::parse("n@N");
    /// assert_eq!(d.attribute.as_deref(), Some("n"));
    /// assert_eq!(d.variable.as_deref(), Some("N"));
    /// assert!(Descriptor::parse("").is_discard());
    /// ```
    pub fn parse(spec: &str) -> Self {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        match spec.split_once('@') {
            Some((attribute, variable)) => Self {
                attribute: non_empty(attribute),
                variable: non_empty(variable),
            },
            None => Self {
                attribute: non_empty(spec),
                variable: None,
            },
        }
    }

    /// A descriptor that only binds a variable.
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            attribute: None,
            variable: Some(name.into()),
        }
    }

    /// Whether the token is dropped.
    pub fn is_discard(&self) -> bool {
        self.attribute.is_none() && self.variable.is_none()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(attribute) = &self.attribute {
            write!(f, "{}", attribute)?;
        }
        if let Some(variable) = &self.variable {
            write!(f, "@{}", variable)?;
        }
        Ok(())
    }
}

impl From<&str> for Descriptor {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

struct Binding<T> {
    attribute: Option<Attribute<T>>,
    variable: Option<String>,
}

/// Reads one line whose tokens are assigned to attributes and variables by
/// position.
pub struct FieldsLine<T> {
    bindings: Vec<Binding<T>>,
}

impl<T> FieldsLine<T> {
    /// Resolve descriptors against a shape.
    pub(crate) fn resolve(shape: &Shape<T>, descriptors: Vec<Descriptor>) -> ParseResult<Self> {
        let bindings = descriptors
            .into_iter()
            .map(|d| {
                if d.variable.as_deref().is_some_and(|v| v.contains('@')) {
                    return Err(ParseError::InvalidDescriptor {
                        descriptor: d.to_string(),
                    });
                }
                let attribute = d.attribute.as_deref().map(|a| shape.resolve(a)).transpose()?;
                Ok(Binding {
                    attribute,
                    variable: d.variable,
                })
            })
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self { bindings })
    }

    /// Number of tokens the line must hold.
    #[inline]
    pub fn arity(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn read(&self, ctx: &mut Context, target: &mut T) -> ParseResult<()> {
        line_scoped(ctx, |ctx| {
            let tokens = ctx.next_line()?;
            self.bind(ctx, target, &tokens)
        })
    }

    fn bind(&self, ctx: &mut Context, target: &mut T, tokens: &[String]) -> ParseResult<()> {
        if tokens.len() != self.bindings.len() {
            return Err(ParseError::ArityMismatch {
                expected: self.bindings.len(),
                got: tokens.len(),
            });
        }

        for (binding, token) in self.bindings.iter().zip(tokens) {
            if let Some(attribute) = &binding.attribute {
                attribute.assign(target, token)?;
            }
            if let Some(variable) = &binding.variable {
                ctx.set_variable(variable.as_str(), token.as_str());
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for FieldsLine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptors: Vec<String> = self
            .bindings
            .iter()
            .map(|b| {
                let attribute = b.attribute.as_ref().map_or("", Attribute::name);
                match &b.variable {
                    Some(v) => format!("{}@{}", attribute, v),
                    None => attribute.to_string(),
                }
            })
            .collect();
        f.debug_struct("FieldsLine")
            .field("descriptors", &descriptors)
            .finish()
    }
}

type Collect<T> = Arc<dyn Fn(&mut T, &[String]) -> ParseResult<()> + Send + Sync>;

/// Reads one line whose tokens all convert to the same element type and are
/// stored as one collection.
pub struct ElementsLine<T> {
    name: String,
    len: Option<Size<T>>,
    collect: Collect<T>,
}

impl<T: 'static> ElementsLine<T> {
    /// Elements converted with [`FromToken`].
    pub(crate) fn primitive<E, F>(name: String, len: Option<Size<T>>, setter: F) -> Self
    where
        E: FromToken,
        F: Fn(&mut T, Vec<E>) + Send + Sync + 'static,
    {
        Self {
            name,
            len,
            collect: Arc::new(move |target: &mut T, tokens: &[String]| {
                let items = tokens
                    .iter()
                    .map(|t| E::from_token(t))
                    .collect::<ParseResult<Vec<E>>>()?;
                setter(target, items);
                Ok(())
            }),
        }
    }

    /// Elements converted with a caller-supplied function.
    pub(crate) fn custom<E, C, F>(name: String, convert: C, setter: F) -> Self
    where
        E: 'static,
        C: Fn(&str) -> Result<E, String> + Send + Sync + 'static,
        F: Fn(&mut T, Vec<E>) + Send + Sync + 'static,
    {
        Self {
            name,
            len: None,
            collect: Arc::new(move |target: &mut T, tokens: &[String]| {
                let items = tokens
                    .iter()
                    .map(|t| {
                        convert(t).map_err(|message| ParseError::CustomConversion {
                            value: t.clone(),
                            message,
                        })
                    })
                    .collect::<ParseResult<Vec<E>>>()?;
                setter(target, items);
                Ok(())
            }),
        }
    }
}

impl<T> ElementsLine<T> {
    /// Destination name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn read(&self, ctx: &mut Context, target: &mut T) -> ParseResult<()> {
        line_scoped(ctx, |ctx| {
            let tokens = ctx.next_line()?;
            if let Some(len) = &self.len {
                let expected = len.resolve(ctx, target, &self.name)?;
                if tokens.len() != expected {
                    return Err(ParseError::ArityMismatch {
                        expected,
                        got: tokens.len(),
                    });
                }
            }
            (self.collect)(target, &tokens)
        })
    }
}

impl<T> fmt::Debug for ElementsLine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementsLine")
            .field("name", &self.name)
            .field("len", &self.len)
            .finish()
    }
}
