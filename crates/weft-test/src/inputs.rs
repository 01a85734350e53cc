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

use std::fmt::Write;
use weft_core::ErrorKind;

/// Count line, then three words.
pub const LISTING: &str = "3\na b c";

/// Two children with two and one values.
pub const FAMILY: &str = "2\n2\n10 20\n1\n30";

/// One line too many tokens for a pair.
pub const PAIR_TOO_WIDE: &str = "1 2 3";

/// A valid pair followed by a line nothing reads.
pub const PAIR_EXTRA_LINE: &str = "1 2\nextra line";

/// `N = 3`, then three cells.
pub const CELLS: &str = "3\n10\n20\n30";

/// Three nodes, three weighted edges.
pub const TRIANGLE: &str = "3 3\n0 1 1.5\n1 2 2.5\n2 0 4";

/// Inputs the pair reader rejects, with the expected error kind.
pub fn invalid_pair_samples() -> Vec<(&'static str, &'static str, ErrorKind)> {
    vec![
        ("empty", "", ErrorKind::StreamExhausted),
        ("blank_line", "  ", ErrorKind::ArityMismatch),
        ("too_wide", PAIR_TOO_WIDE, ErrorKind::ArityMismatch),
        ("too_narrow", "1", ErrorKind::ArityMismatch),
        ("not_a_number", "1 two", ErrorKind::ConversionFailure),
        ("overflow", "1 99999999999", ErrorKind::ConversionFailure),
        ("extra_line", PAIR_EXTRA_LINE, ErrorKind::IncompleteRead),
    ]
}

/// A listing of `n` generated words.
pub fn listing_input(n: usize) -> String {
    let words: Vec<String> = (0..n).map(|i| format!("w{}", i)).collect();
    format!("{}\n{}", n, words.join(" "))
}

/// A graph with deterministic pseudo-random edges.
pub fn graph_input(nodes: usize, edges: usize) -> String {
    let mut out = format!("{} {}\n", nodes, edges);
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..edges {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let from = state as usize % nodes.max(1);
        let to = (state >> 20) as usize % nodes.max(1);
        let weight = (state >> 40) % 1000;
        let _ = writeln!(out, "{} {} {}.{}", from, to, weight / 10, weight % 10);
    }
    out
}
