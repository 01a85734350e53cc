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

//! Token conversion.
//!
//! [`convert`] is the single place where a token becomes a typed value. Field
//! setters, array readers and constructor adapters all route through it, so
//! acceptance rules and error messages are the same everywhere a token is read.
//!
//! | Kind | Rust type | Accepted tokens |
//! |------|-----------|-----------------|
//! | [`Kind::Bool`] | `bool` | `true`/`false` (any case), `1`/`0` |
//! | [`Kind::Int`] | `i32` | `str::parse` |
//! | [`Kind::Long`] | `i64` (and `u32`, `u64`, `usize` with range checks) | `str::parse` |
//! | [`Kind::Float`] | `f32` | `str::parse` |
//! | [`Kind::Double`] | `f64` | `str::parse` |
//! | [`Kind::Char`] | `char` | exactly one character |
//! | [`Kind::Str`] | `String` | anything |

use crate::error::{ParseError, ParseResult};
use std::fmt;

/// The scalar kinds a token can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Single character.
    Char,
    /// String passthrough.
    Str,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Long => write!(f, "long"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Char => write!(f, "character"),
            Self::Str => write!(f, "string"),
        }
    }
}

/// A converted token.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer value.
    Int(i32),
    /// 64-bit integer value.
    Long(i64),
    /// 32-bit float value.
    Float(f32),
    /// 64-bit float value.
    Double(f64),
    /// Character value.
    Char(char),
    /// String value.
    Str(String),
}

impl Value {
    /// The kind this value was converted as.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Long(_) => Kind::Long,
            Self::Float(_) => Kind::Float,
            Self::Double(_) => Kind::Double,
            Self::Char(_) => Kind::Char,
            Self::Str(_) => Kind::Str,
        }
    }

    /// Try to get the value as a 64-bit integer.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(i64::from(*n)),
            Self::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Formats the value as a token that converts back to an equal value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Long(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Double(n) => write!(f, "{}", n),
            Self::Char(c) => write!(f, "{}", c),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Convert a token to a value of the given kind.
///
/// # Examples
///
/// ```
/// use weft_core::{convert, Kind, Value};
///
/// assert_eq!(convert(Kind::Bool, "1").unwrap(), Value::Bool(true));
/// assert_eq!(convert(Kind::Bool, "FALSE").unwrap(), Value::Bool(false));
/// assert_eq!(convert(Kind::Long, "-42").unwrap(), Value::Long(-42));
/// assert!(convert(Kind::Char, "ab").is_err());
/// ```
pub fn convert(kind: Kind, token: &str) -> ParseResult<Value> {
    let failure = || ParseError::ConversionFailure {
        kind,
        value: token.to_string(),
    };

    match kind {
        Kind::Bool => parse_bool(token).map(Value::Bool).ok_or_else(failure),
        Kind::Int => token.parse().map(Value::Int).map_err(|_| failure()),
        Kind::Long => token.parse().map(Value::Long).map_err(|_| failure()),
        Kind::Float => token.parse().map(Value::Float).map_err(|_| failure()),
        Kind::Double => token.parse().map(Value::Double).map_err(|_| failure()),
        Kind::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(failure()),
            }
        }
        Kind::Str => Ok(Value::Str(token.to_string())),
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    if token == "1" || token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token == "0" || token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Rust types that can be read from a single token.
///
/// The associated [`KIND`](Self::KIND) selects the conversion rule; the
/// converted [`Value`] is then unpacked by [`from_value`](Self::from_value).
pub trait FromToken: Sized + Send + 'static {
    /// Kind the token is converted as.
    const KIND: Kind;

    /// Unpack a value converted as [`Self::KIND`]. Returns `None` if it does
    /// not fit this type.
    fn from_value(value: Value) -> Option<Self>;

    /// Convert a token.
    fn from_token(token: &str) -> ParseResult<Self> {
        let value = convert(Self::KIND, token)?;
        Self::from_value(value).ok_or_else(|| ParseError::ConversionFailure {
            kind: Self::KIND,
            value: token.to_string(),
        })
    }
}

macro_rules! impl_from_token {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromToken for $ty {
                const KIND: Kind = Kind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_token!(
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Str,
);

// Counts and indices: read as Long, rejected if negative or out of range.
macro_rules! impl_from_token_unsigned {
    ($($ty:ty),*) => {
        $(
            impl FromToken for $ty {
                const KIND: Kind = Kind::Long;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Long(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_token_unsigned!(u32, u64, usize);

/// Fixed-arity groups of tokens, used by constructor readers.
///
/// Implemented for tuples of one to eight [`FromToken`] types; the tuple's
/// length is the arity and each position is converted with its own kind.
///
/// ```
/// use weft_core::FromTokens;
///
/// let tokens = vec!["3".to_string(), "x".to_string()];
/// let (n, c) = <(i32, char)>::from_tokens(&tokens).unwrap();
/// assert_eq!((n, c), (3, 'x'));
/// ```
pub trait FromTokens: Sized + Send + 'static {
    /// Number of tokens consumed.
    const ARITY: usize;

    /// Convert exactly [`Self::ARITY`] tokens.
    fn from_tokens(tokens: &[String]) -> ParseResult<Self>;
}

macro_rules! impl_from_tokens {
    ($arity:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name: FromToken),+> FromTokens for ($($name,)+) {
            const ARITY: usize = $arity;

            fn from_tokens(tokens: &[String]) -> ParseResult<Self> {
                if tokens.len() != Self::ARITY {
                    return Err(ParseError::ArityMismatch {
                        expected: Self::ARITY,
                        got: tokens.len(),
                    });
                }
                Ok(($($name::from_token(&tokens[$idx])?,)+))
            }
        }
    };
}

impl_from_tokens!(1; A: 0);
impl_from_tokens!(2; A: 0, B: 1);
impl_from_tokens!(3; A: 0, B: 1, C: 2);
impl_from_tokens!(4; A: 0, B: 1, C: 2, D: 3);
impl_from_tokens!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_from_tokens!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_from_tokens!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_from_tokens!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // ==================== Boolean tests ====================

    #[test]
    fn test_bool_words_any_case() {
        assert_eq!(convert(Kind::Bool, "true").unwrap(), Value::Bool(true));
        assert_eq!(convert(Kind::Bool, "True").unwrap(), Value::Bool(true));
        assert_eq!(convert(Kind::Bool, "FALSE").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_bool_digit_shorthand() {
        assert_eq!(convert(Kind::Bool, "1").unwrap(), Value::Bool(true));
        assert_eq!(convert(Kind::Bool, "0").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_bool_rejects_other() {
        for token in ["2", "yes", "t", ""] {
            let err = convert(Kind::Bool, token).unwrap_err();
            assert_eq!(
                err,
                ParseError::ConversionFailure {
                    kind: Kind::Bool,
                    value: token.to_string()
                }
            );
        }
    }

    // ==================== Numeric tests ====================

    #[test]
    fn test_int_bounds() {
        assert_eq!(convert(Kind::Int, "2147483647").unwrap(), Value::Int(i32::MAX));
        assert!(convert(Kind::Int, "2147483648").is_err());
        assert_eq!(
            convert(Kind::Long, "2147483648").unwrap(),
            Value::Long(2_147_483_648)
        );
    }

    #[test]
    fn test_numeric_failure_message() {
        let err = convert(Kind::Long, "12a").unwrap_err();
        assert_eq!(err.to_string(), "Cannot convert '12a' to long");
        assert_eq!(err.kind(), ErrorKind::ConversionFailure);
    }

    #[test]
    fn test_floats() {
        assert_eq!(convert(Kind::Double, "2.5").unwrap(), Value::Double(2.5));
        assert_eq!(convert(Kind::Float, "-0.25").unwrap(), Value::Float(-0.25));
        assert_eq!(convert(Kind::Double, "1e3").unwrap(), Value::Double(1000.0));
        assert!(convert(Kind::Double, "1,5").is_err());
    }

    // ==================== Character and string tests ====================

    #[test]
    fn test_char_exactly_one() {
        assert_eq!(convert(Kind::Char, "#").unwrap(), Value::Char('#'));
        assert_eq!(convert(Kind::Char, "é").unwrap(), Value::Char('é'));
        assert!(convert(Kind::Char, "").is_err());
        assert!(convert(Kind::Char, "ab").is_err());
    }

    #[test]
    fn test_string_passthrough() {
        assert_eq!(
            convert(Kind::Str, "anything-42").unwrap(),
            Value::Str("anything-42".to_string())
        );
    }

    // ==================== FromToken tests ====================

    #[test]
    fn test_from_token_primitives() {
        assert_eq!(i32::from_token("7").unwrap(), 7);
        assert_eq!(i64::from_token("-7").unwrap(), -7);
        assert!(bool::from_token("1").unwrap());
        assert_eq!(String::from_token("abc").unwrap(), "abc");
        assert_eq!(char::from_token("z").unwrap(), 'z');
    }

    #[test]
    fn test_from_token_unsigned_rejects_negative() {
        assert_eq!(usize::from_token("12").unwrap(), 12);
        let err = usize::from_token("-1").unwrap_err();
        assert_eq!(
            err,
            ParseError::ConversionFailure {
                kind: Kind::Long,
                value: "-1".to_string()
            }
        );
        assert!(u32::from_token("4294967296").is_err());
    }

    // ==================== FromTokens tests ====================

    #[test]
    fn test_from_tokens_tuple() {
        let tokens: Vec<String> = ["1", "2.5", "x", "true"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (a, b, c, d) = <(i64, f64, char, bool)>::from_tokens(&tokens).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2.5);
        assert_eq!(c, 'x');
        assert!(d);
    }

    #[test]
    fn test_from_tokens_arity() {
        let tokens = vec!["1".to_string()];
        let err = <(i64, i64)>::from_tokens(&tokens).unwrap_err();
        assert_eq!(err, ParseError::ArityMismatch { expected: 2, got: 1 });
        assert_eq!(<(i64, i64, i64, i64, i64, i64, i64, i64)>::ARITY, 8);
    }

    // ==================== Display round trip tests ====================

    #[test]
    fn test_value_display_round_trip() {
        let values = [
            Value::Bool(false),
            Value::Int(-12),
            Value::Long(9_000_000_000),
            Value::Float(0.1),
            Value::Double(1.0 / 3.0),
            Value::Char('q'),
            Value::Str("word".to_string()),
        ];
        for value in values {
            let token = value.to_string();
            assert_eq!(convert(value.kind(), &token).unwrap(), value);
        }
    }
}
