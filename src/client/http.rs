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

//! HTTP client for the Databricks SQL REST API.
//!
//! Wraps `reqwest` with bearer token authentication and retry with
//! exponential backoff for transient failures.

use crate::auth::AuthProvider;
use crate::error::{Error, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Read timeout duration.
    pub read_timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retry attempts (doubles each retry).
    pub retry_delay: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(120),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            user_agent: format!("databricks-legacy-metadata/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Authenticated HTTP client with retry for transient failures.
///
/// Retries are performed for connect/timeout errors and for
/// 429, 502, 503 and 504 responses. Anything else is returned immediately.
#[derive(Debug)]
pub struct DatabricksHttpClient {
    client: Client,
    config: HttpClientConfig,
    auth_provider: Arc<dyn AuthProvider>,
}

impl DatabricksHttpClient {
    pub fn new(config: HttpClientConfig, auth_provider: Arc<dyn AuthProvider>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Io(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            auth_provider,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request and decode the JSON response body.
    pub async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.send(method, url, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Io(format!(
                "Failed to parse response from {}: {} - body: {}",
                url, e, text
            ))
        })
    }

    /// Send a request and return the raw response body.
    pub async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let mut builder = self
                .client
                .request(method.clone(), url)
                .header("Authorization", self.auth_provider.get_auth_header()?);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            debug!(
                "Executing {} {} (attempt {}/{})",
                method,
                url,
                attempts,
                self.config.max_retries + 1
            );

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .text()
                            .await
                            .map_err(|e| Error::Io(format!("Failed to read response: {}", e)));
                    }

                    if Self::is_retryable_status(status) && attempts <= self.config.max_retries {
                        warn!(
                            "Request failed with {} (attempt {}/{}), retrying...",
                            status,
                            attempts,
                            self.config.max_retries + 1
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    let error_body = response.text().await.unwrap_or_default();
                    return Err(Error::Io(format!(
                        "HTTP {} - {}",
                        status.as_u16(),
                        error_body
                    )));
                }
                Err(e) => {
                    if Self::is_retryable_error(&e) && attempts <= self.config.max_retries {
                        warn!(
                            "Request failed with error (attempt {}/{}): {}, retrying...",
                            attempts,
                            self.config.max_retries + 1,
                            e
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    return Err(Error::Io(format!(
                        "HTTP request failed after {} attempts: {}",
                        attempts, e
                    )));
                }
            }
        }
    }

    fn is_retryable_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
                | StatusCode::BAD_GATEWAY
        )
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.config.retry_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    async fn wait_for_retry(&self, attempt: u32) {
        let delay = self.retry_delay(attempt);
        debug!("Waiting {:?} before retry", delay);
        sleep(delay).await;
    }
}
