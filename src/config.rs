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

//! Workflow configuration for the metadata source.
//!
//! The configuration is camelCase JSON:
//!
//! ```json
//! {
//!   "serviceName": "local_databricks",
//!   "serviceConnection": {"config": {
//!     "type": "Databricks",
//!     "hostPort": "adb-1.azuredatabricks.net:443",
//!     "token": "dapi...",
//!     "httpPath": "/sql/1.0/warehouses/abc123"
//!   }},
//!   "sourceConfig": {"config": {"databaseFilterPattern": {"includes": ["^prod"]}}}
//! }
//! ```

use crate::client::{DatabricksClientConfig, HttpClientConfig};
use crate::error::{Error, Result};
use crate::filter::CompiledFilter;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection type accepted by this source.
pub const DATABRICKS_CONNECTION_TYPE: &str = "Databricks";

/// Top-level workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    pub service_name: String,
    pub service_connection: ServiceConnection,
    #[serde(default)]
    pub source_config: SourceConfigEnvelope,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConnection {
    pub config: DatabricksConnection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfigEnvelope {
    #[serde(default)]
    pub config: DatabaseSourceConfig,
}

/// Connection settings for a Databricks SQL warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabricksConnection {
    #[serde(rename = "type", default = "default_connection_type")]
    pub connection_type: String,

    /// Workspace host, with or without scheme and port.
    pub host_port: String,

    /// Personal access token.
    pub token: String,

    /// Warehouse HTTP path, e.g. `/sql/1.0/warehouses/{id}`.
    pub http_path: String,

    /// Restrict extraction to this catalog.
    #[serde(default)]
    pub catalog: Option<String>,

    /// Restrict extraction to this schema.
    #[serde(default)]
    pub database_schema: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

/// Include/exclude regex lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPattern {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// Filtering options of the database metadata pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSourceConfig {
    #[serde(default)]
    pub database_filter_pattern: Option<FilterPattern>,
    #[serde(default)]
    pub schema_filter_pattern: Option<FilterPattern>,
    /// Filter databases on their fully qualified name instead of the raw name.
    #[serde(default)]
    pub use_fqn_for_filtering: bool,
}

fn default_connection_type() -> String {
    DATABRICKS_CONNECTION_TYPE.to_string()
}

fn default_connection_timeout() -> u64 {
    120
}

impl SourceConfig {
    /// Parse and validate a workflow configuration.
    ///
    /// A connection whose `type` is not `Databricks` is rejected with
    /// [`Error::InvalidSource`] before the rest of the document is decoded.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        if let Some(connection_type) = raw
            .pointer("/serviceConnection/config/type")
            .and_then(|v| v.as_str())
        {
            if connection_type != DATABRICKS_CONNECTION_TYPE {
                return Err(Error::InvalidSource(format!(
                    "Expected DatabricksConnection, but got {}",
                    connection_type
                )));
            }
        }

        let config: SourceConfig = serde_json::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let connection = &self.service_connection.config;
        if connection.connection_type != DATABRICKS_CONNECTION_TYPE {
            return Err(Error::InvalidSource(format!(
                "Expected DatabricksConnection, but got {}",
                connection.connection_type
            )));
        }
        connection.warehouse_id()?;

        let source = &self.source_config.config;
        for pattern in [&source.database_filter_pattern, &source.schema_filter_pattern]
            .into_iter()
            .flatten()
        {
            pattern.validate()?;
        }
        Ok(())
    }

    pub fn connection(&self) -> &DatabricksConnection {
        &self.service_connection.config
    }

    pub fn filters(&self) -> &DatabaseSourceConfig {
        &self.source_config.config
    }
}

impl DatabricksConnection {
    /// Host as an absolute URL.
    pub fn host_url(&self) -> String {
        let host = self.host_port.trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Warehouse ID named by `httpPath`.
    pub fn warehouse_id(&self) -> Result<String> {
        extract_warehouse_id(&self.http_path).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "httpPath '{}' does not name a SQL warehouse (expected /sql/1.0/warehouses/{{id}})",
                self.http_path
            ))
        })
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            read_timeout: Duration::from_secs(self.connection_timeout),
            ..Default::default()
        }
    }

    pub fn client_config(&self) -> DatabricksClientConfig {
        DatabricksClientConfig::default()
    }

    /// The catalog override. An empty string means not configured.
    pub fn configured_catalog(&self) -> Option<&str> {
        self.catalog.as_deref().filter(|c| !c.is_empty())
    }

    /// The schema override. An empty string means not configured.
    pub fn configured_schema(&self) -> Option<&str> {
        self.database_schema.as_deref().filter(|s| !s.is_empty())
    }
}

impl FilterPattern {
    /// Compile every pattern so bad regexes fail at load time.
    pub fn validate(&self) -> Result<()> {
        CompiledFilter::new(self).map(|_| ())
    }
}

/// Extract warehouse ID from HTTP path.
/// Format: /sql/1.0/warehouses/{warehouse_id}
pub(crate) fn extract_warehouse_id(http_path: &str) -> Option<String> {
    http_path
        .strip_prefix("/sql/1.0/warehouses/")
        .or_else(|| http_path.strip_prefix("sql/1.0/warehouses/"))
        .map(|s| s.trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "serviceName": "local_databricks",
        "serviceConnection": {"config": {
            "type": "Databricks",
            "hostPort": "adb-1.azuredatabricks.net:443",
            "token": "dapi-test",
            "httpPath": "/sql/1.0/warehouses/abc123",
            "catalog": "main"
        }},
        "sourceConfig": {"config": {
            "databaseFilterPattern": {"includes": ["^prod"], "excludes": []},
            "useFqnForFiltering": true
        }},
        "logging": {"level": "debug"}
    }"#;

    #[test]
    fn test_from_json() {
        let config = SourceConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.service_name, "local_databricks");
        let conn = config.connection();
        assert_eq!(conn.catalog.as_deref(), Some("main"));
        assert_eq!(conn.database_schema, None);
        assert_eq!(conn.connection_timeout, 120);
        assert_eq!(conn.warehouse_id().unwrap(), "abc123");
        assert!(config.filters().use_fqn_for_filtering);
        assert_eq!(
            config.filters().database_filter_pattern,
            Some(FilterPattern {
                includes: vec!["^prod".to_string()],
                excludes: vec![],
            })
        );
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_minimal_config_defaults() {
        let json = r#"{
            "serviceName": "svc",
            "serviceConnection": {"config": {
                "hostPort": "https://adb-1.azuredatabricks.net/",
                "token": "t",
                "httpPath": "sql/1.0/warehouses/w1/"
            }}
        }"#;
        let config = SourceConfig::from_json(json).unwrap();
        let conn = config.connection();
        assert_eq!(conn.connection_type, "Databricks");
        assert_eq!(conn.host_url(), "https://adb-1.azuredatabricks.net");
        assert_eq!(conn.warehouse_id().unwrap(), "w1");
        assert!(config.filters().database_filter_pattern.is_none());
        assert!(!config.filters().use_fqn_for_filtering);
    }

    #[test]
    fn test_wrong_connection_type_rejected() {
        let json = CONFIG.replace("\"Databricks\"", "\"Mysql\"");
        let err = SourceConfig::from_json(&json).unwrap_err();
        match err {
            Error::InvalidSource(msg) => {
                assert_eq!(msg, "Expected DatabricksConnection, but got Mysql")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_http_path_rejected() {
        let json = CONFIG.replace("/sql/1.0/warehouses/abc123", "/sql/protocolv1/o/1/0123");
        assert!(matches!(
            SourceConfig::from_json(&json),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_filter_regex_rejected() {
        let json = CONFIG.replace("^prod", "(unclosed");
        assert!(matches!(SourceConfig::from_json(&json), Err(Error::Regex(_))));
    }

    #[test]
    fn test_empty_overrides_are_not_configured() {
        let json = CONFIG.replace(
            "\"catalog\": \"main\"",
            "\"catalog\": \"\", \"databaseSchema\": \"\"",
        );
        let config = SourceConfig::from_json(&json).unwrap();
        assert_eq!(config.connection().catalog.as_deref(), Some(""));
        assert_eq!(config.connection().configured_catalog(), None);
        assert_eq!(config.connection().configured_schema(), None);

        let config = SourceConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.connection().configured_catalog(), Some("main"));
    }

    #[test]
    fn test_host_url_adds_scheme() {
        let json = CONFIG.to_string();
        let config = SourceConfig::from_json(&json).unwrap();
        assert_eq!(
            config.connection().host_url(),
            "https://adb-1.azuredatabricks.net:443"
        );
        assert_eq!(
            config.connection().http_config().read_timeout,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_extract_warehouse_id() {
        assert_eq!(
            extract_warehouse_id("/sql/1.0/warehouses/abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_warehouse_id("/sql/1.0/warehouses/abc123/"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_warehouse_id("/sql/1.0/warehouses/"), None);
        assert_eq!(extract_warehouse_id("/other/path"), None);
    }
}
