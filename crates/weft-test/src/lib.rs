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

//! Shared test fixtures for weft crates.
//!
//! This crate provides target types, their shapes, composed readers, and
//! canonical inputs so the same puzzle layouts are exercised by unit tests,
//! integration tests, benches and the batch runner tests.
//!
//! # Quick Start
//!
//! ```rust
//! use weft_core::parse;
//! use weft_test::{fixtures, inputs};
//!
//! let listing = parse(&fixtures::listing_reader(), inputs::LISTING).unwrap();
//! assert_eq!(listing.items, ["a", "b", "c"]);
//!
//! for (name, input, kind) in inputs::invalid_pair_samples() {
//!     let err = parse(&fixtures::pair_reader(), input).unwrap_err();
//!     assert_eq!(err.kind(), kind, "{}", name);
//! }
//! ```

/// Target types, shapes and composed readers.
pub mod fixtures;

/// Canonical and generated input text.
pub mod inputs;

pub use fixtures::*;

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::parse;

    #[test]
    fn test_all_readers_build() {
        listing_reader();
        family_reader();
        pair_reader();
        cells_reader();
        graph_reader();
    }

    #[test]
    fn test_generated_graph_parses() {
        let graph = parse(&graph_reader(), &inputs::graph_input(10, 25)).unwrap();
        assert_eq!(graph.nodes, 10);
        assert_eq!(graph.edges.len(), 25);
        assert!(graph.edges.iter().all(|e| e.from < 10 && e.to < 10));
    }

    #[test]
    fn test_generated_listing_parses() {
        let listing = parse(&listing_reader(), &inputs::listing_input(100)).unwrap();
        assert_eq!(listing.n, 100);
        assert_eq!(listing.items.len(), 100);
    }
}
