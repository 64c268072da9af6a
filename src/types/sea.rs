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

//! SEA (Statement Execution API) request/response types.
//!
//! These types map directly to the JSON structures used by the Databricks
//! SQL Statement Execution API. Metadata statements always use the `INLINE`
//! disposition with `JSON_ARRAY` format, so only the inline parts of the
//! result payload are modelled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response from statement execution or status polling.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementExecutionResponse {
    pub statement_id: String,
    pub status: StatementStatus,
    #[serde(default)]
    pub manifest: Option<ResultManifest>,
    #[serde(default)]
    pub result: Option<ResultData>,
}

/// Status of a statement execution.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementStatus {
    pub state: StatementState,
    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// Possible states of a statement during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
}

impl StatementState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatementState::Pending | StatementState::Running)
    }
}

/// Error information from the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceError {
    /// Message suitable for an error value, prefixed with the error code.
    pub fn describe(&self) -> String {
        match (&self.error_code, &self.message) {
            (Some(code), Some(msg)) => format!("[{}] {}", code, msg),
            (None, Some(msg)) => msg.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// Manifest describing the result set.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultManifest {
    pub format: String,
    #[serde(default)]
    pub total_row_count: Option<i64>,
    #[serde(default)]
    pub truncated: bool,
}

/// Inline result data from the initial execution response or a chunk fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub chunk_index: Option<i64>,
    #[serde(default)]
    pub next_chunk_index: Option<i64>,
    /// Present only for `EXTERNAL_LINKS` dispositions, which metadata
    /// statements never request.
    #[serde(default)]
    pub external_links: Option<Vec<serde_json::Value>>,
    /// Rows in `JSON_ARRAY` format; SQL NULL is encoded as JSON `null`.
    #[serde(default)]
    pub data_array: Option<Vec<Vec<Option<String>>>>,
}

/// Request body for statement execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteStatementRequest {
    pub warehouse_id: String,
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub disposition: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_wait_timeout: Option<String>,
}

/// Request body for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub warehouse_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub session_configuration: HashMap<String, String>,
}

/// Response from session creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}
