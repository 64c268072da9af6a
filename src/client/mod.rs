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

//! Client implementations for communicating with Databricks SQL endpoints.
//!
//! This module provides:
//! - `DatabricksClient` trait: Abstract interface for Databricks backends
//! - `DatabricksHttpClient`: Low-level HTTP client with retry logic
//! - `SeaClient`: Implementation using the Statement Execution API (REST)

pub mod http;
pub mod sea;

use crate::error::Result;
use crate::types::Row;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub use http::{DatabricksHttpClient, HttpClientConfig};
pub use sea::SeaClient;

/// Statement execution tuning shared by all backends.
#[derive(Debug, Clone)]
pub struct DatabricksClientConfig {
    /// Server-side wait before the execute call returns a pending statement.
    pub wait_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Give up polling after this long.
    pub poll_timeout: Duration,
}

impl Default for DatabricksClientConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
            poll_timeout: Duration::from_secs(600),
        }
    }
}

/// Session information returned from create_session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: String,
}

/// Fully materialized result of a metadata statement.
#[derive(Debug, Clone, Default)]
pub struct ExecuteResult {
    pub statement_id: String,
    pub rows: Vec<Row>,
}

/// Abstract interface for Databricks backends.
///
/// Metadata statements return small results, so implementations collect
/// every row before returning.
#[async_trait]
pub trait DatabricksClient: Send + Sync + std::fmt::Debug {
    /// Create a new session with the given catalog/schema context.
    async fn create_session(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        session_config: HashMap<String, String>,
    ) -> Result<SessionInfo>;

    /// Delete/close a session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Execute a SQL statement within a session and wait for its rows.
    ///
    /// A statement that reaches the `FAILED` state is reported as
    /// [`crate::Error::Database`].
    async fn execute_statement(&self, session_id: &str, sql: &str) -> Result<ExecuteResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = DatabricksClientConfig::default();
        assert_eq!(config.wait_timeout, Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_millis(200));
        assert!(config.poll_timeout > config.wait_timeout);
    }
}
