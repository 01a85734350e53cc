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

//! Parse configuration.

use regex::Regex;

/// Default maximum number of elements a repeated section may resolve to.
///
/// Checked before any element is read.
///
/// ```
/// # use weft_core::ParseConfig;
/// let config = ParseConfig::default();
/// assert_eq!(config.max_repeat, 10_000_000);
/// ```
pub const DEFAULT_MAX_REPEAT: usize = 10_000_000;

/// How a raw line is split into tokens.
///
/// Blank (whitespace-only) lines always yield zero tokens. Other lines are
/// trimmed before splitting.
#[derive(Debug, Clone, Default)]
pub enum Delimiter {
    /// Runs of whitespace separate tokens (default).
    #[default]
    Whitespace,
    /// A single character separates tokens. Empty tokens between adjacent
    /// separators are kept; each token is trimmed.
    Char(char),
    /// A regular expression separates tokens. Empty tokens are kept.
    Pattern(Regex),
}

impl Delimiter {
    /// Compile a regular-expression delimiter.
    ///
    /// ```
    /// use weft_core::Delimiter;
    ///
    /// let delimiter = Delimiter::pattern(r"\s*[,;]\s*").unwrap();
    /// assert_eq!(delimiter.split("1, 2;3"), vec!["1", "2", "3"]);
    /// ```
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Split one raw line into tokens.
    pub fn split(&self, line: &str) -> Vec<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        match self {
            Self::Whitespace => trimmed.split_whitespace().map(str::to_owned).collect(),
            Self::Char(c) => trimmed.split(*c).map(|t| t.trim().to_owned()).collect(),
            Self::Pattern(re) => re.split(trimmed).map(str::to_owned).collect(),
        }
    }
}

/// Configuration for a parse.
///
/// # Examples
///
/// ```
/// use weft_core::{Delimiter, ParseConfig};
///
/// let config = ParseConfig {
///     delimiter: Delimiter::Char(','),
///     ..Default::default()
/// };
/// assert_eq!(config.delimiter.split("a,b"), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Token delimiter (default: whitespace runs).
    pub delimiter: Delimiter,

    /// Maximum element count of any repeated section (default: 10,000,000).
    pub max_repeat: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Whitespace tests ====================

    #[test]
    fn test_whitespace_runs() {
        let d = Delimiter::Whitespace;
        assert_eq!(d.split("  1 \t 2   3 "), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_blank_lines_have_no_tokens() {
        for d in [
            Delimiter::Whitespace,
            Delimiter::Char(','),
            Delimiter::pattern(",").unwrap(),
        ] {
            assert!(d.split("").is_empty());
            assert!(d.split("   \t").is_empty());
        }
    }

    // ==================== Character delimiter tests ====================

    #[test]
    fn test_char_keeps_empty_tokens() {
        let d = Delimiter::Char(',');
        assert_eq!(d.split("a,,b"), vec!["a", "", "b"]);
        assert_eq!(d.split("a, b ,c"), vec!["a", "b", "c"]);
    }

    // ==================== Pattern delimiter tests ====================

    #[test]
    fn test_pattern_split() {
        let d = Delimiter::pattern(r"\|").unwrap();
        assert_eq!(d.split("x|y|z"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Delimiter::pattern("(").is_err());
    }

    // ==================== Default config tests ====================

    #[test]
    fn test_default_config() {
        let config = ParseConfig::default();
        assert!(matches!(config.delimiter, Delimiter::Whitespace));
        assert_eq!(config.max_repeat, DEFAULT_MAX_REPEAT);
    }
}
