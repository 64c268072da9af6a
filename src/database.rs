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

//! SEA-backed connection factory.

use crate::auth::PersonalAccessToken;
use crate::client::{
    DatabricksClient, DatabricksClientConfig, DatabricksHttpClient, HttpClientConfig, SeaClient,
};
use crate::config::DatabricksConnection;
use crate::connection::{Connection, ConnectionConfig, ConnectionFactory, SqlConnection};
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::debug;

/// Holds what every connection to one warehouse shares: the HTTP client,
/// the SEA client and the tokio runtime that drives them.
///
/// Each call to [`ConnectionFactory::connect`] opens a fresh session bound
/// to the requested catalog.
#[derive(Debug)]
pub struct Database {
    host: String,
    warehouse_id: String,
    client: Arc<dyn DatabricksClient>,
    runtime: Arc<Runtime>,
}

impl Database {
    /// Build the transport stack for a Databricks connection.
    pub fn new(connection: &DatabricksConnection) -> Result<Self> {
        let host = connection.host_url();
        let warehouse_id = connection.warehouse_id()?;
        Self::with_config(
            host,
            warehouse_id,
            &connection.token,
            connection.http_config(),
            connection.client_config(),
        )
    }

    pub fn with_config(
        host: impl Into<String>,
        warehouse_id: impl Into<String>,
        token: &str,
        http_config: HttpClientConfig,
        client_config: DatabricksClientConfig,
    ) -> Result<Self> {
        let host = host.into();
        let warehouse_id = warehouse_id.into();
        if token.is_empty() {
            return Err(Error::InvalidConfig("access token not set".to_string()));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| Error::Io(format!("Failed to create async runtime: {}", e)))?;

        let auth = Arc::new(PersonalAccessToken::new(token));
        let http_client = Arc::new(DatabricksHttpClient::new(http_config, auth)?);
        let client: Arc<dyn DatabricksClient> = Arc::new(SeaClient::new(
            http_client,
            host.clone(),
            warehouse_id.clone(),
            client_config,
        ));

        debug!(
            "Configured SEA transport for {} with warehouse {}",
            host, warehouse_id
        );

        Ok(Self {
            host,
            warehouse_id,
            client,
            runtime: Arc::new(runtime),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }
}

impl ConnectionFactory for Database {
    fn connect(&self, catalog: Option<&str>) -> Result<Box<dyn SqlConnection>> {
        debug!(
            "Creating connection to {} with warehouse {} (catalog={:?})",
            self.host, self.warehouse_id, catalog
        );

        let config = ConnectionConfig {
            host: self.host.clone(),
            warehouse_id: self.warehouse_id.clone(),
            catalog: catalog.map(str::to_string),
            client: self.client.clone(),
        };

        let connection = Connection::new_with_runtime(config, self.runtime.clone())?;
        Ok(Box::new(connection))
    }
}
