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

//! Databricks legacy (Hive metastore) metadata source for Rust
//!
//! This crate extracts structural metadata (catalogs, schemas, tables,
//! views, columns, comments and view definitions) from Databricks SQL
//! endpoints backed by a Hive metastore, including legacy endpoints that
//! predate Unity Catalog.
//!
//! ## Overview
//!
//! - [`DatabricksLegacySource`] - Walks databases and schemas and answers
//!   per-table lookups
//! - [`MetadataDialect`] - Statements and result layouts for one server family
//! - [`ConnectionFactory`] / [`SqlConnection`] - Catalog-scoped connections
//! - [`Database`] - Connection factory over the Statement Execution API
//!
//! ## Features
//!
//! - **Generation probe**: `SHOW CATALOGS` decides between legacy and
//!   catalog-aware endpoints, once per source
//! - **Nested types**: `struct`, `array` and `map` columns are resolved with
//!   a per-column `DESCRIBE`
//! - **Server variants**: both Hive and Spark row layouts of `SHOW VIEWS`
//!
//! ## Example
//!
//! ```no_run
//! use databricks_legacy_metadata::DatabricksLegacySource;
//!
//! # fn main() -> databricks_legacy_metadata::Result<()> {
//! let config = std::fs::read_to_string("databricks.json")
//!     .map_err(|e| databricks_legacy_metadata::Error::Io(e.to_string()))?;
//! let mut source = DatabricksLegacySource::create(&config)?;
//!
//! let mut databases = source.database_names();
//! while let Some(database) = databases.next(&mut source) {
//!     let database = database?;
//!     for schema in source.database_schema_names()? {
//!         for table in source.get_table_names(Some(&schema))? {
//!             let columns = source.get_columns(&table, Some(&schema))?;
//!             println!("{}.{}.{}: {} columns", database, schema, table, columns.len());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! | Key | Description |
//! |-----|-------------|
//! | `serviceConnection.config.hostPort` | Workspace host |
//! | `serviceConnection.config.httpPath` | SQL warehouse HTTP path |
//! | `serviceConnection.config.token` | Personal access token |
//! | `serviceConnection.config.catalog` | Only extract this catalog |
//! | `serviceConnection.config.databaseSchema` | Only extract this schema |
//! | `sourceConfig.config.databaseFilterPattern` | Include/exclude regexes for catalogs |
//! | `sourceConfig.config.schemaFilterPattern` | Include/exclude regexes for schemas |
//! | `sourceConfig.config.useFqnForFiltering` | Filter on fully qualified names |
//! | `logging.level` / `logging.file` | Log level and optional log file |

pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod filter;
pub mod fqn;
pub mod logging;
pub mod metadata;
pub mod source;
pub mod status;
pub mod types;

// Re-export main types
pub use config::SourceConfig;
pub use connection::{Connection, ConnectionFactory, SqlConnection};
pub use database::Database;
pub use error::{Error, Result};
pub use metadata::{
    ColumnDescriptor, DatabricksDialect, MetadataDialect, MetastoreGeneration, SemanticType,
    TableComment, TypeRegistry,
};
pub use source::{DatabaseWalk, DatabricksLegacySource, DEFAULT_DATABASE};
pub use status::SourceStatus;
pub use types::Row;

// Re-export client types for advanced users
pub use client::{DatabricksClient, DatabricksHttpClient, HttpClientConfig, SeaClient};
