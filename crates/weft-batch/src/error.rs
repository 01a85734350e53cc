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

//! Structured error types for batch runs.

use thiserror::Error;
use weft_core::{ErrorKind, ParseError};

/// Failure of one task, or of a whole run.
///
/// # Cloning
///
/// Implements `Clone` so per-task failures can be kept on the report and
/// also collected into [`BatchError::Failed`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    /// The task input did not match the reader.
    #[error("Task '{task}': {source}")]
    Parse {
        /// Task name
        task: String,
        /// The parse failure
        #[source]
        source: ParseError,
    },

    /// The solve function returned an error.
    #[error("Task '{task}' failed to solve: {message}")]
    Solve {
        /// Task name
        task: String,
        /// Error message from the solve function
        message: String,
    },

    /// The solve function panicked.
    #[error("Task '{task}' panicked: {message}")]
    Panicked {
        /// Task name
        task: String,
        /// Panic payload, if it was a string
        message: String,
    },

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    Pool(String),

    /// One or more tasks of a run failed.
    #[error("{} of {total} task(s) failed", .failures.len())]
    Failed {
        /// Number of tasks in the run
        total: usize,
        /// Every task failure, in task order
        failures: Vec<BatchError>,
    },
}

impl BatchError {
    /// Name of the task this error belongs to, if it is a task error.
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::Parse { task, .. } | Self::Solve { task, .. } | Self::Panicked { task, .. } => {
                Some(task)
            }
            Self::Pool(_) | Self::Failed { .. } => None,
        }
    }

    /// Parse error category, for parse failures.
    pub fn parse_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Parse { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
