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

//! Metastore generation detection.

use crate::connection::SqlConnection;
use crate::error::Result;
use crate::metadata::sql::SHOW_CATALOGS;
use std::fmt;
use tracing::debug;

/// Whether the endpoint has catalog-level namespacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetastoreGeneration {
    /// Pre Unity Catalog: one implicit database.
    Legacy,
    /// Multi-catalog (Unity Catalog).
    CatalogAware,
}

impl MetastoreGeneration {
    /// Probe with `SHOW CATALOGS`.
    ///
    /// An engine-reported failure means the statement is not understood and
    /// the endpoint is legacy. Transport failures are returned as errors so
    /// a network blip is not mistaken for a legacy endpoint.
    pub fn detect(conn: &dyn SqlConnection) -> Result<Self> {
        match conn.execute(SHOW_CATALOGS) {
            Ok(_) => Ok(MetastoreGeneration::CatalogAware),
            Err(e) if e.is_query_failure() => {
                debug!("SHOW CATALOGS failed, assuming legacy metastore: {}", e);
                Ok(MetastoreGeneration::Legacy)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_legacy(self) -> bool {
        self == MetastoreGeneration::Legacy
    }
}

impl fmt::Display for MetastoreGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetastoreGeneration::Legacy => f.write_str("legacy"),
            MetastoreGeneration::CatalogAware => f.write_str("catalog-aware"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::Row;

    #[derive(Debug)]
    struct ProbeConnection(fn() -> Result<Vec<Row>>);

    impl SqlConnection for ProbeConnection {
        fn execute(&self, sql: &str) -> Result<Vec<Row>> {
            assert_eq!(sql, "SHOW CATALOGS");
            (self.0)()
        }

        fn catalog(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_detect_catalog_aware() {
        let conn = ProbeConnection(|| Ok(vec![Row::from(vec!["main"])]));
        assert_eq!(
            MetastoreGeneration::detect(&conn).unwrap(),
            MetastoreGeneration::CatalogAware
        );
    }

    #[test]
    fn test_detect_catalog_aware_with_empty_listing() {
        let conn = ProbeConnection(|| Ok(vec![]));
        assert_eq!(
            MetastoreGeneration::detect(&conn).unwrap(),
            MetastoreGeneration::CatalogAware
        );
    }

    #[test]
    fn test_detect_legacy_on_database_error() {
        let conn = ProbeConnection(|| {
            Err(Error::Database(
                "[PARSE_SYNTAX_ERROR] Syntax error at or near 'CATALOGS'".to_string(),
            ))
        });
        let generation = MetastoreGeneration::detect(&conn).unwrap();
        assert!(generation.is_legacy());
    }

    #[test]
    fn test_detect_propagates_transport_error() {
        let conn = ProbeConnection(|| Err(Error::Io("HTTP 503".to_string())));
        assert!(matches!(
            MetastoreGeneration::detect(&conn),
            Err(Error::Io(_))
        ));
    }
}
