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

//! Batch Runs for weft Readers
//!
//! Runs one composed reader over many independent inputs on a fixed-size
//! worker pool, passing each parsed value to a solve function.
//!
//! # Features
//!
//! - **Fixed Pool**: a dedicated rayon pool sized by [`BatchConfig::threads`]
//! - **Error Resilience**: parse errors, solve errors and panics are recorded
//!   per task without cancelling the others
//! - **Ordered Report**: outcomes come back in task order once every task is
//!   done
//! - **Structured Logging**: per-failure `warn` and per-run `info` events via
//!   `tracing`

mod error;
mod runner;

pub use error::{BatchError, BatchResult};
pub use runner::{BatchConfig, BatchReport, BatchRunner, Task, TaskOutcome};
