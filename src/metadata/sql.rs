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

//! SQL command builder for metadata queries.
//!
//! Builds the `SHOW`/`DESCRIBE` statements understood by Hive-metastore
//! backed Databricks endpoints, including legacy ones that predate
//! Unity Catalog.

use crate::error::{Error, Result};

/// Lists catalogs. Fails on legacy endpoints.
pub const SHOW_CATALOGS: &str = "SHOW CATALOGS";

/// Table comment lookup; rendered with [`render_template`].
pub const TABLE_COMMENT_TEMPLATE: &str = "DESCRIBE TABLE EXTENDED {schema_name}.{table_name}";

/// Every view definition visible in the current catalog.
pub const VIEW_DEFINITIONS: &str = "select TABLE_NAME as view_name, TABLE_SCHEMA as schema, \
VIEW_DEFINITION as view_def from INFORMATION_SCHEMA.VIEWS WHERE VIEW_DEFINITION IS NOT NULL";

/// Builds SQL commands for metadata queries.
///
/// # Examples
///
/// ```
/// use databricks_legacy_metadata::metadata::SqlCommandBuilder;
///
/// let sql = SqlCommandBuilder::new()
///     .with_schema(Some("sales"))
///     .build_show_views();
/// assert_eq!(sql, "SHOW VIEWS IN `sales`");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlCommandBuilder {
    catalog: Option<String>,
    schema: Option<String>,
}

impl SqlCommandBuilder {
    /// Create a new builder with no catalog or schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog name for the query.
    pub fn with_catalog(mut self, catalog: Option<&str>) -> Self {
        self.catalog = catalog.map(|s| s.to_string());
        self
    }

    /// Set the schema name for the query.
    pub fn with_schema(mut self, schema: Option<&str>) -> Self {
        self.schema = schema.map(|s| s.to_string());
        self
    }

    /// Build `SHOW CATALOGS` command.
    pub fn build_show_catalogs(&self) -> String {
        SHOW_CATALOGS.to_string()
    }

    /// Build `SHOW SCHEMAS` command. Lists the schemas of the current catalog.
    pub fn build_show_schemas(&self) -> String {
        "SHOW SCHEMAS".to_string()
    }

    /// Build `USE CATALOG '{catalog}'`. Requires a catalog.
    pub fn build_use_catalog(&self) -> Result<String> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or_else(|| Error::InvalidState("catalog is required for USE CATALOG".into()))?;
        Ok(format!("USE CATALOG '{}'", catalog))
    }

    /// Build `SHOW VIEWS`, scoped with ``IN `schema` `` when a schema is set.
    pub fn build_show_views(&self) -> String {
        self.show_in_schema("SHOW VIEWS")
    }

    /// Build `SHOW TABLES`, scoped with ``IN `schema` `` when a schema is set.
    pub fn build_show_tables(&self) -> String {
        self.show_in_schema("SHOW TABLES")
    }

    /// Build `DESCRIBE {schema}.{table}` (or `DESCRIBE {table}`).
    pub fn build_describe_table(&self, table: &str) -> String {
        match self.schema {
            Some(ref schema) => format!("DESCRIBE {}.{}", schema, table),
            None => format!("DESCRIBE {}", table),
        }
    }

    /// Build the per-column `DESCRIBE` used to recover a nested type.
    ///
    /// Qualifies the table with catalog and schema only when both are set.
    pub fn build_describe_column(&self, table: &str, column: &str) -> String {
        match (&self.catalog, &self.schema) {
            (Some(catalog), Some(schema)) => {
                format!("DESCRIBE {}.{}.{} {}", catalog, schema, table, column)
            }
            (None, Some(schema)) => format!("DESCRIBE {}.{} {}", schema, table, column),
            _ => format!("DESCRIBE {} {}", table, column),
        }
    }

    /// Build the table comment lookup.
    pub fn build_table_comment(&self, table: &str) -> String {
        match self.schema {
            Some(ref schema) => render_template(TABLE_COMMENT_TEMPLATE, schema, table),
            None => format!("DESCRIBE TABLE EXTENDED {}", table),
        }
    }

    /// Build the `INFORMATION_SCHEMA.VIEWS` listing.
    pub fn build_view_definitions(&self) -> String {
        VIEW_DEFINITIONS.to_string()
    }

    fn show_in_schema(&self, command: &str) -> String {
        match self.schema {
            Some(ref schema) => format!("{} IN {}", command, Self::escape_identifier(schema)),
            None => command.to_string(),
        }
    }

    /// Escape an identifier with backticks, doubling embedded backticks.
    pub fn escape_identifier(name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Substitute `{schema_name}` and `{table_name}` placeholders.
pub fn render_template(template: &str, schema_name: &str, table_name: &str) -> String {
    template
        .replace("{schema_name}", schema_name)
        .replace("{table_name}", table_name)
}
