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

//! The Databricks legacy metadata source.
//!
//! [`DatabricksLegacySource`] walks catalogs (databases), schemas, tables
//! and views of a Hive-metastore backed endpoint. The endpoint generation
//! is probed once at construction. Walking databases rebinds the source to
//! each catalog in turn, so per-catalog lookups always run against a
//! connection scoped to the catalog currently being walked.

use crate::config::{SourceConfig, DATABRICKS_CONNECTION_TYPE};
use crate::connection::ConnectionFactory;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::filter::{filter_by_database, filter_by_schema, CompiledFilter};
use crate::fqn::{build_database_fqn, build_schema_fqn};
use crate::logging::init_logging;
use crate::metadata::dialect::{DatabricksDialect, Inspector, MetadataDialect};
use crate::metadata::parse::parse_first_column;
use crate::metadata::sql::SqlCommandBuilder;
use crate::metadata::type_mapping::TypeRegistry;
use crate::metadata::types::{ColumnDescriptor, TableComment};
use crate::metadata::version::MetastoreGeneration;
use crate::status::SourceStatus;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The single implicit database of a legacy endpoint.
pub const DEFAULT_DATABASE: &str = "default";

/// The catalog the source is bound to and the inspector for it.
#[derive(Debug)]
pub struct CatalogContext {
    name: Option<String>,
    inspector: Inspector,
}

impl CatalogContext {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }
}

/// Metadata source for Databricks endpoints backed by a Hive metastore.
#[derive(Debug)]
pub struct DatabricksLegacySource {
    config: SourceConfig,
    factory: Box<dyn ConnectionFactory>,
    dialect: Arc<dyn MetadataDialect>,
    generation: MetastoreGeneration,
    context: CatalogContext,
    database_filter: Option<CompiledFilter>,
    schema_filter: Option<CompiledFilter>,
    status: SourceStatus,
}

impl DatabricksLegacySource {
    /// Build a source from a JSON workflow configuration, talking to the
    /// warehouse over the Statement Execution API.
    pub fn create(config_json: &str) -> Result<Self> {
        let config = SourceConfig::from_json(config_json)?;
        init_logging(&config.logging);
        let database = Database::new(config.connection())?;
        Self::new(config, Box::new(database))
    }

    /// Build a source over any connection factory using the Databricks dialect.
    pub fn new(config: SourceConfig, factory: Box<dyn ConnectionFactory>) -> Result<Self> {
        let dialect = DatabricksDialect::new(TypeRegistry::new());
        Self::with_dialect(config, factory, Arc::new(dialect))
    }

    /// Build a source with an explicit dialect.
    ///
    /// Opens the initial connection (bound to the configured catalog, if
    /// any) and probes the metastore generation once.
    pub fn with_dialect(
        config: SourceConfig,
        factory: Box<dyn ConnectionFactory>,
        dialect: Arc<dyn MetadataDialect>,
    ) -> Result<Self> {
        let connection_type = &config.connection().connection_type;
        if connection_type != DATABRICKS_CONNECTION_TYPE {
            return Err(Error::InvalidSource(format!(
                "Expected DatabricksConnection, but got {}",
                connection_type
            )));
        }

        let database_filter =
            CompiledFilter::from_config(config.filters().database_filter_pattern.as_ref())?;
        let schema_filter =
            CompiledFilter::from_config(config.filters().schema_filter_pattern.as_ref())?;

        let catalog = config.connection().configured_catalog().map(str::to_string);
        let conn = factory.connect(catalog.as_deref())?;
        let generation = MetastoreGeneration::detect(conn.as_ref())?;
        info!(
            "Detected {} metastore for service {}",
            generation, config.service_name
        );

        let context = CatalogContext {
            name: catalog,
            inspector: Inspector::new(conn, dialect.clone()),
        };

        Ok(Self {
            config,
            factory,
            dialect,
            generation,
            context,
            database_filter,
            schema_filter,
            status: SourceStatus::new(),
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn generation(&self) -> MetastoreGeneration {
        self.generation
    }

    pub fn is_legacy(&self) -> bool {
        self.generation.is_legacy()
    }

    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    pub fn context(&self) -> &CatalogContext {
        &self.context
    }

    /// Catalog the source is currently bound to.
    pub fn current_database(&self) -> Option<&str> {
        self.context.name()
    }

    /// The catalog named in the connection configuration, if any.
    pub fn get_configured_database(&self) -> Option<&str> {
        self.config.connection().configured_catalog()
    }

    /// Rebind the source to `catalog`.
    ///
    /// The previous context stays in place if the new connection fails.
    pub fn set_catalog(&mut self, catalog: &str) -> Result<()> {
        let conn = self.factory.connect(Some(catalog))?;
        debug!("Bound source to catalog {}", catalog);
        self.context = CatalogContext {
            name: Some(catalog.to_string()),
            inspector: Inspector::new(conn, self.dialect.clone()),
        };
        Ok(())
    }

    /// Database names as the endpoint reports them, without filtering.
    ///
    /// A legacy endpoint yields `"default"` without a query. Otherwise
    /// `SHOW CATALOGS` runs when the first item is pulled.
    pub fn database_names_raw(&self) -> Box<dyn Iterator<Item = Result<String>> + '_> {
        if self.is_legacy() {
            return Box::new(std::iter::once(Ok(DEFAULT_DATABASE.to_string())));
        }
        Box::new(
            std::iter::once_with(move || self.list_catalogs()).flat_map(|listed| match listed {
                Ok(names) => names.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }),
        )
    }

    /// Start a walk over the databases to extract.
    ///
    /// The walk does not borrow the source: each [`DatabaseWalk::next`] call
    /// takes it, rebinds it to the next database and returns its name, so
    /// per-catalog lookups can run between pulls.
    ///
    /// With a configured catalog only that catalog is yielded and nothing
    /// is listed. Otherwise each raw name goes through the database filter
    /// (on its FQN when `useFqnForFiltering` is set); a catalog that cannot
    /// be bound is logged, recorded as failed and skipped.
    pub fn database_names(&self) -> DatabaseWalk {
        let state = match self.get_configured_database() {
            Some(catalog) => WalkState::Configured(catalog.to_string()),
            None => WalkState::Start,
        };
        DatabaseWalk { state }
    }

    /// Schemas of the current database.
    ///
    /// With a configured `databaseSchema` only that schema is returned.
    pub fn database_schema_names(&mut self) -> Result<Vec<String>> {
        if let Some(schema) = self.config.connection().configured_schema() {
            return Ok(vec![schema.to_string()]);
        }

        let database = self.context.name.clone();
        let schemas = self
            .context
            .inspector
            .get_schema_names(database.as_deref(), self.is_legacy())?;

        let database_name = database.unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let use_fqn = self.config.filters().use_fqn_for_filtering;

        let mut kept = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let schema_fqn = build_schema_fqn(&self.config.service_name, &database_name, &schema);
            let target = if use_fqn { &schema_fqn } else { &schema };
            if filter_by_schema(self.schema_filter.as_ref(), target) {
                self.status.filter(schema_fqn, "Schema Filtered Out");
                continue;
            }
            kept.push(schema);
        }
        Ok(kept)
    }

    pub fn get_table_names(&self, schema: Option<&str>) -> Result<Vec<String>> {
        self.context.inspector.get_table_names(schema)
    }

    pub fn get_view_names(&self, schema: Option<&str>) -> Result<Vec<String>> {
        self.context.inspector.get_view_names(schema)
    }

    /// Columns of `table`. Complex types are qualified with the current
    /// catalog on catalog-aware endpoints.
    pub fn get_columns(&self, table: &str, schema: Option<&str>) -> Result<Vec<ColumnDescriptor>> {
        let db_name = if self.is_legacy() {
            None
        } else {
            self.context.name()
        };
        self.context.inspector.get_columns(table, schema, db_name)
    }

    pub fn get_table_comment(&self, table: &str, schema: Option<&str>) -> TableComment {
        self.context.inspector.get_table_comment(table, schema)
    }

    pub fn get_view_definition(&mut self, view: &str, schema: Option<&str>) -> Result<Option<String>> {
        self.context.inspector.get_view_definition(view, schema)
    }

    fn list_catalogs(&self) -> Result<Vec<String>> {
        let sql = SqlCommandBuilder::new().build_show_catalogs();
        let rows = self.context.inspector.connection().execute(&sql)?;
        Ok(parse_first_column(&rows))
    }

    fn database_filtered_out(&mut self, name: &str) -> bool {
        let fqn = build_database_fqn(&self.config.service_name, name);
        let target = if self.config.filters().use_fqn_for_filtering {
            fqn.as_str()
        } else {
            name
        };
        if filter_by_database(self.database_filter.as_ref(), target) {
            self.status.filter(fqn, "Database Filtered Out");
            return true;
        }
        false
    }
}

#[derive(Debug)]
enum WalkState {
    Configured(String),
    Start,
    Walking(VecDeque<String>),
    Done,
}

/// Cursor over the databases of a source. See
/// [`DatabricksLegacySource::database_names`].
#[derive(Debug)]
pub struct DatabaseWalk {
    state: WalkState,
}

impl DatabaseWalk {
    /// Rebind `source` to the next database and return its name.
    ///
    /// Returns `None` once the walk is exhausted. A listing failure is
    /// returned once and ends the walk.
    pub fn next(&mut self, source: &mut DatabricksLegacySource) -> Option<Result<String>> {
        loop {
            match std::mem::replace(&mut self.state, WalkState::Done) {
                WalkState::Done => return None,
                WalkState::Configured(catalog) => {
                    return Some(source.set_catalog(&catalog).map(|_| catalog));
                }
                WalkState::Start => {
                    let listed: Result<Vec<String>> = source.database_names_raw().collect();
                    match listed {
                        Ok(names) => self.state = WalkState::Walking(names.into()),
                        Err(e) => return Some(Err(e)),
                    }
                }
                WalkState::Walking(mut pending) => {
                    let name = pending.pop_front()?;
                    self.state = WalkState::Walking(pending);

                    if source.database_filtered_out(&name) {
                        continue;
                    }
                    match source.set_catalog(&name) {
                        Ok(()) => return Some(Ok(name)),
                        Err(e) => {
                            error!("Error trying to connect to database {}: {:?}", name, e);
                            warn!("Skipping database {}: {}", name, e);
                            source.status.failed(&name, &e);
                        }
                    }
                }
            }
        }
    }

    /// Drain the walk, collecting the names of every bound database.
    ///
    /// Leaves `source` bound to the last database yielded.
    pub fn collect_names(mut self, source: &mut DatabricksLegacySource) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while let Some(name) = self.next(source) {
            names.push(name?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SqlConnection;
    use crate::types::Row;

    #[derive(Debug)]
    struct StaticConnection {
        catalog: Option<String>,
        legacy: bool,
    }

    impl SqlConnection for StaticConnection {
        fn execute(&self, sql: &str) -> Result<Vec<Row>> {
            match sql {
                "SHOW CATALOGS" if self.legacy => Err(Error::Database("no catalogs".into())),
                "SHOW CATALOGS" => Ok(vec![Row::from(vec!["main"]), Row::from(vec!["dev"])]),
                _ => Ok(vec![]),
            }
        }

        fn catalog(&self) -> Option<&str> {
            self.catalog.as_deref()
        }
    }

    #[derive(Debug)]
    struct StaticFactory {
        legacy: bool,
    }

    impl ConnectionFactory for StaticFactory {
        fn connect(&self, catalog: Option<&str>) -> Result<Box<dyn SqlConnection>> {
            Ok(Box::new(StaticConnection {
                catalog: catalog.map(str::to_string),
                legacy: self.legacy,
            }))
        }
    }

    fn config(connection_type: &str) -> SourceConfig {
        let json = format!(
            r#"{{
                "serviceName": "svc",
                "serviceConnection": {{"config": {{
                    "type": "{}",
                    "hostPort": "localhost",
                    "token": "t",
                    "httpPath": "/sql/1.0/warehouses/w"
                }}}}
            }}"#,
            connection_type
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_rejects_non_databricks_connection() {
        let err = DatabricksLegacySource::new(
            config("Mysql"),
            Box::new(StaticFactory { legacy: false }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSource(_)));
    }

    #[test]
    fn test_legacy_raw_names() {
        let source = DatabricksLegacySource::new(
            config("Databricks"),
            Box::new(StaticFactory { legacy: true }),
        )
        .unwrap();
        assert!(source.is_legacy());
        let names: Vec<String> = source
            .database_names_raw()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names, vec![DEFAULT_DATABASE]);
    }

    #[test]
    fn test_catalog_aware_walk_rebinds() {
        let mut source = DatabricksLegacySource::new(
            config("Databricks"),
            Box::new(StaticFactory { legacy: false }),
        )
        .unwrap();
        assert_eq!(source.generation(), MetastoreGeneration::CatalogAware);

        let mut walk = source.database_names();
        assert_eq!(walk.next(&mut source).unwrap().unwrap(), "main");
        assert_eq!(source.current_database(), Some("main"));
        assert_eq!(walk.next(&mut source).unwrap().unwrap(), "dev");
        assert!(walk.next(&mut source).is_none());
        assert!(walk.next(&mut source).is_none());

        assert_eq!(source.current_database(), Some("dev"));
        assert_eq!(source.context().inspector().catalog(), Some("dev"));
    }
}
