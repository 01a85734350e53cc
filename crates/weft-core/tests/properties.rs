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

//! Property-based tests for conversion and composition.
//!
//! # Properties Tested
//!
//! 1. **Conversion Roundtrip**: a value's token form converts back to it
//! 2. **Field Assignment**: matching arity assigns every attribute in order
//! 3. **Container Sizes**: a section of size N yields N elements in stream order
//! 4. **Arity Detection**: any token count other than the declared one fails
//! 5. **Declared Counts**: a word line must hold exactly the announced count

use proptest::prelude::*;
use weft_core::{convert, parse, ErrorKind, Kind, ParseError, Value};
use weft_test::fixtures;

fn roundtrip(value: Value) -> Result<(), TestCaseError> {
    let token = value.to_string();
    let back = convert(value.kind(), &token);
    prop_assert_eq!(back, Ok(value), "token {:?}", token);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: integers survive a trip through their token form.
    #[test]
    fn prop_integer_roundtrips(n: i32, m: i64) {
        roundtrip(Value::Int(n))?;
        roundtrip(Value::Long(m))?;
    }

    /// Property: finite floats survive a trip through their token form.
    #[test]
    fn prop_float_roundtrips(
        x in prop::num::f32::NORMAL | prop::num::f32::ZERO,
        y in prop::num::f64::NORMAL | prop::num::f64::ZERO,
    ) {
        roundtrip(Value::Float(x))?;
        roundtrip(Value::Double(y))?;
    }

    /// Property: booleans, characters and strings roundtrip.
    #[test]
    fn prop_text_roundtrips(b: bool, c: char, s in "\\PC*") {
        roundtrip(Value::Bool(b))?;
        roundtrip(Value::Char(c))?;
        roundtrip(Value::Str(s))?;
    }

    /// Property: an integer token is never accepted as a boolean unless it is
    /// 0 or 1.
    #[test]
    fn prop_bool_rejects_other_integers(n in 2_i64..1_000_000) {
        let result = convert(Kind::Bool, &n.to_string());
        prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::ConversionFailure);
    }

    /// Property: a line with exactly the declared tokens fills every field.
    #[test]
    fn prop_pair_fields_assigned(a: i32, b: i32) {
        let pair = parse(&fixtures::pair_reader(), &format!("{} {}", a, b)).unwrap();
        prop_assert_eq!(pair, fixtures::Pair { a, b });
    }

    /// Property: any other token count is an arity mismatch on line 1.
    #[test]
    fn prop_pair_arity_mismatch(values in prop::collection::vec(any::<i32>(), 0..10)) {
        prop_assume!(values.len() != 2);
        let line = values.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");

        let err = parse(&fixtures::pair_reader(), &line).unwrap_err();
        if values.is_empty() {
            // Empty input has no line at all.
            prop_assert_eq!(err.kind(), ErrorKind::StreamExhausted);
        } else {
            prop_assert_eq!(
                err.inner(),
                &ParseError::ArityMismatch { expected: 2, got: values.len() }
            );
            prop_assert_eq!(err.line(), Some(1));
        }
    }

    /// Property: a variable-sized section yields exactly N elements in order.
    #[test]
    fn prop_cells_in_order(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let mut input = values.len().to_string();
        for v in &values {
            input.push('\n');
            input.push_str(&v.to_string());
        }

        let cells = parse(&fixtures::cells_reader(), &input).unwrap();
        let parsed: Vec<i64> = cells.cells.iter().map(|c| c.v).collect();
        prop_assert_eq!(parsed, values);
    }

    /// Property: the declared count and the listed words always agree.
    #[test]
    fn prop_listing_words(words in prop::collection::vec("[a-z]{1,8}", 0..32)) {
        let input = format!("{}\n{}\n", words.len(), words.join(" "));
        let listing = parse(&fixtures::listing_reader(), &input).unwrap();
        prop_assert_eq!(listing.n as usize, words.len());
        prop_assert_eq!(listing.items, words);
    }

    /// Property: a count that disagrees with the word line is rejected on
    /// that line.
    #[test]
    fn prop_listing_count_mismatch(
        words in prop::collection::vec("[a-z]{1,8}", 1..32),
        extra in 1usize..4,
    ) {
        let input = format!("{}\n{}\n", words.len() + extra, words.join(" "));
        let err = parse(&fixtures::listing_reader(), &input).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::ArityMismatch);
        prop_assert_eq!(err.line(), Some(2));
    }
}
