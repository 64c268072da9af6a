// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for metadata extraction.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to a Databricks endpoint or decoding its
/// metadata results.
#[derive(Debug, Error)]
pub enum Error {
    /// The workflow configuration does not describe a Databricks source.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// A configuration value is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The engine accepted the statement but reported a failure.
    #[error("database error: {0}")]
    Database(String),

    /// Transport level failure (HTTP, session management, response decoding).
    #[error("I/O error: {0}")]
    Io(String),

    /// `DESCRIBE` was issued against a table the metastore does not know.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A metadata result did not have the expected shape.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// The endpoint answered in a way this crate does not handle yet.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Internal invariant violated.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid filter pattern.
    #[error("invalid filter pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Returns `true` if the engine itself rejected or failed the statement,
    /// as opposed to the request never reaching it.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, Error::Database(_) | Error::TableNotFound(_))
    }
}
