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

//! Blocking SQL connections used by the metadata walkers.

use crate::client::DatabricksClient;
use crate::error::Result;
use crate::types::Row;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::debug;

/// A connection able to run one metadata statement at a time.
///
/// Engine-reported statement failures surface as [`crate::Error::Database`];
/// anything else (HTTP, decoding) uses the other error variants.
pub trait SqlConnection: std::fmt::Debug {
    /// Run `sql` and return every row of its result.
    fn execute(&self, sql: &str) -> Result<Vec<Row>>;

    /// Catalog the connection is bound to, if any.
    fn catalog(&self) -> Option<&str>;
}

/// Produces connections bound to a catalog.
pub trait ConnectionFactory: std::fmt::Debug {
    fn connect(&self, catalog: Option<&str>) -> Result<Box<dyn SqlConnection>>;
}

/// Configuration passed from Database to Connection.
pub struct ConnectionConfig {
    pub host: String,
    pub warehouse_id: String,
    pub catalog: Option<String>,
    pub client: Arc<dyn DatabricksClient>,
}

/// A SEA session scoped to one catalog.
///
/// The session is created eagerly and deleted when the connection drops.
#[derive(Debug)]
pub struct Connection {
    host: String,
    warehouse_id: String,
    catalog: Option<String>,

    client: Arc<dyn DatabricksClient>,
    session_id: String,

    // Shared with the Database that created this connection
    runtime: Arc<Runtime>,
}

impl Connection {
    /// Called by `Database::connect()`.
    pub(crate) fn new_with_runtime(config: ConnectionConfig, runtime: Arc<Runtime>) -> Result<Self> {
        let session_info = runtime.block_on(config.client.create_session(
            config.catalog.as_deref(),
            None,
            HashMap::new(),
        ))?;

        debug!(
            "Created session {} (catalog={:?})",
            session_info.session_id, config.catalog
        );

        Ok(Self {
            host: config.host,
            warehouse_id: config.warehouse_id,
            catalog: config.catalog,
            client: config.client,
            session_id: session_info.session_id,
            runtime,
        })
    }

    /// Returns the Databricks host URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl SqlConnection for Connection {
    fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        let result = self
            .runtime
            .block_on(self.client.execute_statement(&self.session_id, sql))?;
        Ok(result.rows)
    }

    fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Closing session {}", self.session_id);
        let _ = self
            .runtime
            .block_on(self.client.delete_session(&self.session_id));
    }
}
