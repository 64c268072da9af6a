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

//! Dialect hooks for Hive-metastore backed Databricks endpoints.
//!
//! A [`MetadataDialect`] knows which statements to issue for each kind of
//! metadata and how to read their results. [`DatabricksDialect`] covers
//! both legacy Hive deployments and catalog-aware ones; alternative
//! dialects can be injected into the source for testing or for other
//! server variants.

use crate::connection::SqlConnection;
use crate::error::{Error, Result};
use crate::metadata::parse::{
    find_data_type, find_table_comment, parse_describe_columns, parse_first_column,
    parse_object_names, parse_view_definitions, view_key,
};
use crate::metadata::sql::SqlCommandBuilder;
use crate::metadata::type_mapping::TypeRegistry;
use crate::metadata::types::{ColumnDescriptor, TableComment};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const INFORMATION_SCHEMA: &str = "information_schema";

/// Per-catalog memo of expensive lookups.
#[derive(Debug, Default)]
pub struct InfoCache {
    view_definitions: Option<HashMap<(String, String), String>>,
}

impl InfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the view definition listing has been loaded.
    pub fn has_view_definitions(&self) -> bool {
        self.view_definitions.is_some()
    }
}

/// Metadata operations whose SQL or result layout depends on the server.
pub trait MetadataDialect: std::fmt::Debug {
    /// Columns of `table`, in declaration order, excluding partition info.
    fn get_columns(
        &self,
        conn: &dyn SqlConnection,
        table: &str,
        schema: Option<&str>,
        db_name: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>>;

    /// Schemas of `database`. Dialects without schema support list none.
    fn get_schema_names(
        &self,
        _conn: &dyn SqlConnection,
        _database: Option<&str>,
        _is_legacy: bool,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn get_view_names(&self, conn: &dyn SqlConnection, schema: Option<&str>)
        -> Result<Vec<String>>;

    fn get_table_names(
        &self,
        conn: &dyn SqlConnection,
        schema: Option<&str>,
    ) -> Result<Vec<String>>;

    /// Table comment. Never fails; problems degrade to an absent comment.
    fn get_table_comment(
        &self,
        conn: &dyn SqlConnection,
        table: &str,
        schema: Option<&str>,
    ) -> TableComment;

    fn get_view_definition(
        &self,
        conn: &dyn SqlConnection,
        cache: &mut InfoCache,
        view: &str,
        schema: Option<&str>,
    ) -> Result<Option<String>>;
}

/// Dialect for Databricks endpoints backed by a Hive metastore.
#[derive(Debug, Clone, Default)]
pub struct DatabricksDialect {
    registry: TypeRegistry,
}

impl DatabricksDialect {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Full nested type of a complex column via a per-column `DESCRIBE`.
    fn describe_complex_type(
        &self,
        conn: &dyn SqlConnection,
        builder: &SqlCommandBuilder,
        table: &str,
        column: &str,
    ) -> Result<String> {
        let sql = builder.build_describe_column(table, column);
        let rows = conn
            .execute(&sql)
            .map_err(|e| table_not_found_or(e, table))?;
        find_data_type(&rows).ok_or_else(|| {
            Error::UnexpectedResult(format!("'{}' returned no data_type row", sql))
        })
    }

    fn query_table_comment(
        &self,
        conn: &dyn SqlConnection,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Option<String>> {
        let sql = SqlCommandBuilder::new()
            .with_schema(schema)
            .build_table_comment(table);
        let rows = conn.execute(&sql)?;
        Ok(find_table_comment(&rows))
    }
}

impl MetadataDialect for DatabricksDialect {
    fn get_columns(
        &self,
        conn: &dyn SqlConnection,
        table: &str,
        schema: Option<&str>,
        db_name: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>> {
        let builder = SqlCommandBuilder::new()
            .with_catalog(db_name)
            .with_schema(schema);
        let rows = conn
            .execute(&builder.build_describe_table(table))
            .map_err(|e| table_not_found_or(e, table))?;

        let mut columns = Vec::new();
        for raw in parse_describe_columns(rows) {
            let semantic_type = self.registry.resolve_type_string(&raw.type_string);
            let column = if semantic_type.is_complex() {
                let full_type = self.describe_complex_type(conn, &builder, table, &raw.name)?;
                ColumnDescriptor::complex(raw.name, semantic_type, full_type, raw.comment)
            } else {
                ColumnDescriptor::new(raw.name, semantic_type, raw.type_string, raw.comment)
            };
            columns.push(column);
        }

        debug!("Decoded {} columns for {}", columns.len(), table);
        Ok(columns)
    }

    fn get_schema_names(
        &self,
        conn: &dyn SqlConnection,
        database: Option<&str>,
        is_legacy: bool,
    ) -> Result<Vec<String>> {
        let builder = SqlCommandBuilder::new().with_catalog(database);
        if database.is_some() && !is_legacy {
            conn.execute(&builder.build_use_catalog()?)?;
        }
        let rows = conn.execute(&builder.build_show_schemas())?;
        Ok(parse_first_column(&rows))
    }

    fn get_view_names(
        &self,
        conn: &dyn SqlConnection,
        schema: Option<&str>,
    ) -> Result<Vec<String>> {
        let sql = SqlCommandBuilder::new()
            .with_schema(schema)
            .build_show_views();
        let rows = conn.execute(&sql)?;
        Ok(parse_object_names(&rows))
    }

    fn get_table_names(
        &self,
        conn: &dyn SqlConnection,
        schema: Option<&str>,
    ) -> Result<Vec<String>> {
        let sql = SqlCommandBuilder::new()
            .with_schema(schema)
            .build_show_tables();
        let rows = conn.execute(&sql)?;
        Ok(parse_object_names(&rows))
    }

    fn get_table_comment(
        &self,
        conn: &dyn SqlConnection,
        table: &str,
        schema: Option<&str>,
    ) -> TableComment {
        match self.query_table_comment(conn, table, schema) {
            Ok(text) => TableComment::new(text),
            Err(e) if e.is_query_failure() => {
                debug!("Failed to fetch comment for table {}: {}", table, e);
                TableComment::absent()
            }
            Err(e) => {
                warn!("Failed to fetch comment for table {}: {}", table, e);
                TableComment::absent()
            }
        }
    }

    fn get_view_definition(
        &self,
        conn: &dyn SqlConnection,
        cache: &mut InfoCache,
        view: &str,
        schema: Option<&str>,
    ) -> Result<Option<String>> {
        let schemas = parse_first_column(&conn.execute(
            &SqlCommandBuilder::new().build_show_schemas(),
        )?);
        if !schemas
            .iter()
            .any(|s| s.eq_ignore_ascii_case(INFORMATION_SCHEMA))
        {
            return Ok(None);
        }

        if cache.view_definitions.is_none() {
            let rows = conn.execute(&SqlCommandBuilder::new().build_view_definitions())?;
            let definitions = parse_view_definitions(&rows);
            debug!("Cached {} view definitions", definitions.len());
            cache.view_definitions = Some(definitions);
        }

        let Some(definitions) = cache.view_definitions.as_ref() else {
            return Ok(None);
        };
        let definition = match schema {
            Some(schema) => definitions.get(&view_key(view, schema)).cloned(),
            // Without a schema, fall back to the first view with that name
            None => {
                let view = view.to_lowercase();
                definitions
                    .iter()
                    .find(|((name, _), _)| *name == view)
                    .map(|(_, def)| def.clone())
            }
        };
        Ok(definition)
    }
}

/// Connection bound to one catalog plus the dialect and cache used with it.
#[derive(Debug)]
pub struct Inspector {
    conn: Box<dyn SqlConnection>,
    dialect: Arc<dyn MetadataDialect>,
    cache: InfoCache,
}

impl Inspector {
    pub fn new(conn: Box<dyn SqlConnection>, dialect: Arc<dyn MetadataDialect>) -> Self {
        Self {
            conn,
            dialect,
            cache: InfoCache::new(),
        }
    }

    pub fn connection(&self) -> &dyn SqlConnection {
        self.conn.as_ref()
    }

    pub fn catalog(&self) -> Option<&str> {
        self.conn.catalog()
    }

    pub fn get_columns(
        &self,
        table: &str,
        schema: Option<&str>,
        db_name: Option<&str>,
    ) -> Result<Vec<ColumnDescriptor>> {
        self.dialect
            .get_columns(self.conn.as_ref(), table, schema, db_name)
    }

    pub fn get_schema_names(&self, database: Option<&str>, is_legacy: bool) -> Result<Vec<String>> {
        self.dialect
            .get_schema_names(self.conn.as_ref(), database, is_legacy)
    }

    pub fn get_view_names(&self, schema: Option<&str>) -> Result<Vec<String>> {
        self.dialect.get_view_names(self.conn.as_ref(), schema)
    }

    pub fn get_table_names(&self, schema: Option<&str>) -> Result<Vec<String>> {
        self.dialect.get_table_names(self.conn.as_ref(), schema)
    }

    pub fn get_table_comment(&self, table: &str, schema: Option<&str>) -> TableComment {
        self.dialect
            .get_table_comment(self.conn.as_ref(), table, schema)
    }

    pub fn get_view_definition(&mut self, view: &str, schema: Option<&str>) -> Result<Option<String>> {
        self.dialect
            .get_view_definition(self.conn.as_ref(), &mut self.cache, view, schema)
    }
}

/// Map "table not found" engine errors to [`Error::TableNotFound`].
fn table_not_found_or(err: Error, table: &str) -> Error {
    match err {
        Error::Database(ref msg)
            if msg.contains("TABLE_OR_VIEW_NOT_FOUND") || msg.contains("Table not found") =>
        {
            Error::TableNotFound(table.to_string())
        }
        other => other,
    }
}
