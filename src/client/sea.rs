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

//! SEA (Statement Execution API) client implementation.
//!
//! This module implements the `DatabricksClient` trait using the Databricks
//! SQL Statement Execution API (REST-based).

use crate::client::{
    DatabricksClient, DatabricksClientConfig, DatabricksHttpClient, ExecuteResult, SessionInfo,
};
use crate::error::{Error, Result};
use crate::types::sea::{
    CreateSessionRequest, CreateSessionResponse, ExecuteStatementRequest, ResultData,
    ResultManifest, StatementExecutionResponse, StatementState,
};
use crate::types::Row;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result format requested for every statement.
const RESULT_FORMAT: &str = "JSON_ARRAY";

/// SEA client for the Databricks SQL Statement Execution API.
#[derive(Debug)]
pub struct SeaClient {
    http_client: Arc<DatabricksHttpClient>,
    host: String,
    warehouse_id: String,
    config: DatabricksClientConfig,
}

impl SeaClient {
    pub fn new(
        http_client: Arc<DatabricksHttpClient>,
        host: impl Into<String>,
        warehouse_id: impl Into<String>,
        config: DatabricksClientConfig,
    ) -> Self {
        Self {
            http_client,
            host: host.into(),
            warehouse_id: warehouse_id.into(),
            config,
        }
    }

    fn base_url(&self) -> String {
        format!("{}/api/2.0/sql", self.host.trim_end_matches('/'))
    }

    /// SEA accepts `0s` or a value between 5 and 50 seconds.
    fn format_wait_timeout(wait: Duration) -> String {
        let secs = wait.as_secs();
        if secs == 0 {
            "0s".to_string()
        } else {
            format!("{}s", secs.clamp(5, 50))
        }
    }

    async fn call_execute_api(
        &self,
        session_id: &str,
        sql: &str,
    ) -> Result<StatementExecutionResponse> {
        let url = format!("{}/statements", self.base_url());

        let request_body = ExecuteStatementRequest {
            warehouse_id: self.warehouse_id.clone(),
            statement: sql.to_string(),
            session_id: Some(session_id.to_string()),
            disposition: "INLINE".to_string(),
            format: RESULT_FORMAT.to_string(),
            wait_timeout: Some(Self::format_wait_timeout(self.config.wait_timeout)),
            on_wait_timeout: Some("CONTINUE".to_string()),
        };

        debug!("Executing statement at {}: {}", url, sql);

        let response: StatementExecutionResponse = self
            .http_client
            .send_json(Method::POST, &url, Some(&request_body))
            .await?;

        debug!(
            "Execute response: statement_id={}, status={:?}",
            response.statement_id, response.status.state
        );

        Ok(response)
    }

    async fn get_statement_status(&self, statement_id: &str) -> Result<StatementExecutionResponse> {
        let url = format!("{}/statements/{}", self.base_url(), statement_id);
        debug!("Getting statement status at {}", url);
        self.http_client
            .send_json::<(), _>(Method::GET, &url, None)
            .await
    }

    async fn fetch_chunk(&self, statement_id: &str, chunk_index: i64) -> Result<ResultData> {
        let url = format!(
            "{}/statements/{}/result/chunks/{}",
            self.base_url(),
            statement_id,
            chunk_index
        );
        debug!("Fetching result chunk at {}", url);
        self.http_client
            .send_json::<(), _>(Method::GET, &url, None)
            .await
    }

    /// Poll until the statement reaches a terminal state.
    async fn wait_for_completion(
        &self,
        response: StatementExecutionResponse,
    ) -> Result<StatementExecutionResponse> {
        let start = std::time::Instant::now();
        let mut current = response;

        while !current.status.state.is_terminal() {
            if start.elapsed() > self.config.poll_timeout {
                return Err(Error::Io(format!(
                    "Statement {} did not finish within {:?}",
                    current.statement_id, self.config.poll_timeout
                )));
            }
            tokio::time::sleep(self.config.poll_interval).await;
            debug!("Polling statement status: {}", current.statement_id);
            current = self.get_statement_status(&current.statement_id).await?;
        }

        match current.status.state {
            StatementState::Succeeded => Ok(current),
            StatementState::Failed => {
                let message = current
                    .status
                    .error
                    .as_ref()
                    .map(|e| e.describe())
                    .unwrap_or_else(|| "Unknown error".to_string());
                Err(Error::Database(message))
            }
            StatementState::Canceled => {
                Err(Error::InvalidState("Statement was canceled".to_string()))
            }
            // Inline results may arrive on an already closed statement.
            StatementState::Closed if current.result.is_some() => {
                debug!("Statement closed with inline result data - treating as success");
                Ok(current)
            }
            StatementState::Closed => Err(Error::InvalidState("Statement was closed".to_string())),
            state @ (StatementState::Pending | StatementState::Running) => Err(
                Error::InvalidState(format!("Statement left polling in state {:?}", state)),
            ),
        }
    }

    /// Collect every inline row, following chunk continuations.
    async fn collect_rows(&self, response: StatementExecutionResponse) -> Result<Vec<Row>> {
        let mut rows = match response.manifest {
            Some(ref manifest) => {
                Self::check_manifest(&response.statement_id, manifest)?;
                Vec::with_capacity(manifest.total_row_count.unwrap_or(0).max(0) as usize)
            }
            None => Vec::new(),
        };
        let mut next = response.result;

        while let Some(data) = next.take() {
            Self::check_inline(&data)?;
            debug!(
                "Statement {} chunk {}",
                response.statement_id,
                data.chunk_index.unwrap_or(0)
            );
            if let Some(values) = data.data_array {
                rows.extend(values.into_iter().map(Row::new));
            }
            if let Some(chunk_index) = data.next_chunk_index {
                next = Some(self.fetch_chunk(&response.statement_id, chunk_index).await?);
            }
        }

        debug!(
            "Statement {} returned {} rows",
            response.statement_id,
            rows.len()
        );
        Ok(rows)
    }

    fn check_manifest(statement_id: &str, manifest: &ResultManifest) -> Result<()> {
        if manifest.format != RESULT_FORMAT {
            return Err(Error::UnexpectedResult(format!(
                "Statement {} returned {} results, expected {}",
                statement_id, manifest.format, RESULT_FORMAT
            )));
        }
        if manifest.truncated {
            warn!("Statement {} returned a truncated result", statement_id);
        }
        Ok(())
    }

    fn check_inline(data: &ResultData) -> Result<()> {
        match data.external_links {
            Some(ref links) if !links.is_empty() => Err(Error::NotImplemented(
                "external result links for metadata statements".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DatabricksClient for SeaClient {
    async fn create_session(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        session_config: HashMap<String, String>,
    ) -> Result<SessionInfo> {
        let url = format!("{}/sessions", self.base_url());

        let request_body = CreateSessionRequest {
            warehouse_id: self.warehouse_id.clone(),
            catalog: catalog.map(|s| s.to_string()),
            schema: schema.map(|s| s.to_string()),
            session_configuration: session_config,
        };

        debug!("Creating session at {} (catalog={:?})", url, catalog);

        let response: CreateSessionResponse = self
            .http_client
            .send_json(Method::POST, &url, Some(&request_body))
            .await?;

        debug!("Created session: {}", response.session_id);

        Ok(SessionInfo {
            session_id: response.session_id,
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/sessions/{}", self.base_url(), session_id);
        debug!("Deleting session at {}", url);

        // Best effort cleanup
        let _ = self
            .http_client
            .send::<()>(Method::DELETE, &url, None)
            .await;
        Ok(())
    }

    async fn execute_statement(&self, session_id: &str, sql: &str) -> Result<ExecuteResult> {
        let response = self.call_execute_api(session_id, sql).await?;
        let response = self.wait_for_completion(response).await?;
        let statement_id = response.statement_id.clone();
        let rows = self.collect_rows(response).await?;

        Ok(ExecuteResult { statement_id, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PersonalAccessToken;
    use crate::client::HttpClientConfig;
    use crate::types::sea::{ServiceError, StatementStatus};

    fn create_test_client(host: &str) -> SeaClient {
        let auth = Arc::new(PersonalAccessToken::new("test-token"));
        let http_client =
            Arc::new(DatabricksHttpClient::new(HttpClientConfig::default(), auth).unwrap());
        SeaClient::new(
            http_client,
            host,
            "warehouse-123",
            DatabricksClientConfig::default(),
        )
    }

    fn response(state: StatementState, result: Option<ResultData>) -> StatementExecutionResponse {
        StatementExecutionResponse {
            statement_id: "stmt-1".to_string(),
            status: StatementStatus { state, error: None },
            manifest: None,
            result,
        }
    }

    #[test]
    fn test_base_url() {
        let client = create_test_client("https://test.databricks.com");
        assert_eq!(client.base_url(), "https://test.databricks.com/api/2.0/sql");
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let client = create_test_client("https://test.databricks.com/");
        assert_eq!(client.base_url(), "https://test.databricks.com/api/2.0/sql");
    }

    #[test]
    fn test_format_wait_timeout_clamps() {
        assert_eq!(SeaClient::format_wait_timeout(Duration::from_secs(0)), "0s");
        assert_eq!(SeaClient::format_wait_timeout(Duration::from_secs(2)), "5s");
        assert_eq!(SeaClient::format_wait_timeout(Duration::from_secs(30)), "30s");
        assert_eq!(SeaClient::format_wait_timeout(Duration::from_secs(120)), "50s");
    }

    #[test]
    fn test_check_inline_rejects_external_links() {
        let data = ResultData {
            external_links: Some(vec![serde_json::json!({"external_link": "https://x"})]),
            ..Default::default()
        };
        assert!(matches!(
            SeaClient::check_inline(&data),
            Err(Error::NotImplemented(_))
        ));
        assert!(SeaClient::check_inline(&ResultData::default()).is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_completion_failed_is_database_error() {
        let client = create_test_client("https://test.databricks.com");
        let mut failed = response(StatementState::Failed, None);
        failed.status.error = Some(ServiceError {
            error_code: Some("BAD_REQUEST".to_string()),
            message: Some("SHOW CATALOGS is not supported".to_string()),
        });

        let err = client.wait_for_completion(failed).await.unwrap_err();
        assert!(err.is_query_failure());
        assert!(err.to_string().contains("SHOW CATALOGS is not supported"));
    }

    #[tokio::test]
    async fn test_wait_for_completion_closed_with_result() {
        let client = create_test_client("https://test.databricks.com");
        let closed = response(StatementState::Closed, Some(ResultData::default()));
        assert!(client.wait_for_completion(closed).await.is_ok());

        let closed_empty = response(StatementState::Closed, None);
        assert!(matches!(
            client.wait_for_completion(closed_empty).await,
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_wait_for_completion_canceled() {
        let client = create_test_client("https://test.databricks.com");
        let canceled = response(StatementState::Canceled, None);
        assert!(matches!(
            client.wait_for_completion(canceled).await,
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_collect_rows_rejects_unexpected_format() {
        let client = create_test_client("https://test.databricks.com");
        let mut arrow = response(StatementState::Succeeded, Some(ResultData::default()));
        arrow.manifest = Some(ResultManifest {
            format: "ARROW_STREAM".to_string(),
            total_row_count: Some(1),
            truncated: false,
        });
        assert!(matches!(
            client.collect_rows(arrow).await,
            Err(Error::UnexpectedResult(_))
        ));
    }

    #[tokio::test]
    async fn test_collect_rows_single_chunk() {
        let client = create_test_client("https://test.databricks.com");
        let data = ResultData {
            data_array: Some(vec![
                vec![Some("main".to_string())],
                vec![Some("hive_metastore".to_string())],
            ]),
            ..Default::default()
        };
        let mut succeeded = response(StatementState::Succeeded, Some(data));
        succeeded.manifest = Some(ResultManifest {
            format: "JSON_ARRAY".to_string(),
            total_row_count: Some(2),
            truncated: true,
        });
        let rows = client.collect_rows(succeeded).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(0), Some("hive_metastore"));
    }
}
