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

//! Scripted in-memory connection factory shared by the integration tests.

#![allow(dead_code)]

use databricks_legacy_metadata::{
    ConnectionFactory, Error, Result, Row, SourceConfig, SqlConnection,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Reply {
    Rows(Vec<Row>),
    EngineError(String),
    TransportError(String),
}

#[derive(Debug, Default)]
struct Script {
    // (catalog, sql) answers win over catalog-independent ones
    scoped: HashMap<(String, String), Reply>,
    global: HashMap<String, Reply>,
    unreachable_catalogs: HashSet<String>,
    issued: Vec<(Option<String>, String)>,
    connects: Vec<Option<String>>,
}

/// A connection factory answering statements from a script and recording
/// every statement it receives, tagged with the catalog it ran against.
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    script: Arc<Mutex<Script>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `rows` on any catalog.
    pub fn rows(self, sql: &str, rows: Vec<Vec<Option<&str>>>) -> Self {
        self.set_global(sql, Reply::Rows(to_rows(rows)));
        self
    }

    /// Answer `sql` with `rows` when bound to `catalog`.
    pub fn rows_in(self, catalog: &str, sql: &str, rows: Vec<Vec<Option<&str>>>) -> Self {
        self.script.lock().unwrap().scoped.insert(
            (catalog.to_string(), sql.to_string()),
            Reply::Rows(to_rows(rows)),
        );
        self
    }

    /// Fail `sql` with an engine-reported error.
    pub fn engine_error(self, sql: &str, message: &str) -> Self {
        self.set_global(sql, Reply::EngineError(message.to_string()));
        self
    }

    /// Fail `sql` with a transport error.
    pub fn transport_error(self, sql: &str, message: &str) -> Self {
        self.set_global(sql, Reply::TransportError(message.to_string()));
        self
    }

    /// Make `connect(Some(catalog))` fail.
    pub fn unreachable(self, catalog: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .unreachable_catalogs
            .insert(catalog.to_string());
        self
    }

    /// A legacy endpoint: `SHOW CATALOGS` is a syntax error.
    pub fn legacy(self) -> Self {
        self.engine_error(
            "SHOW CATALOGS",
            "[PARSE_SYNTAX_ERROR] Syntax error at or near 'CATALOGS'",
        )
    }

    /// A catalog-aware endpoint listing `catalogs`.
    pub fn catalogs(self, catalogs: &[&str]) -> Self {
        let rows = catalogs.iter().map(|c| vec![Some(*c)]).collect();
        self.rows("SHOW CATALOGS", rows)
    }

    pub fn issued(&self) -> Vec<String> {
        self.script
            .lock()
            .unwrap()
            .issued
            .iter()
            .map(|(_, sql)| sql.clone())
            .collect()
    }

    pub fn issued_with_catalog(&self) -> Vec<(Option<String>, String)> {
        self.script.lock().unwrap().issued.clone()
    }

    pub fn count(&self, sql: &str) -> usize {
        self.issued().iter().filter(|s| s.as_str() == sql).count()
    }

    pub fn connects(&self) -> Vec<Option<String>> {
        self.script.lock().unwrap().connects.clone()
    }

    fn set_global(&self, sql: &str, reply: Reply) {
        self.script
            .lock()
            .unwrap()
            .global
            .insert(sql.to_string(), reply);
    }
}

impl ConnectionFactory for MockFactory {
    fn connect(&self, catalog: Option<&str>) -> Result<Box<dyn SqlConnection>> {
        let mut script = self.script.lock().unwrap();
        script.connects.push(catalog.map(str::to_string));
        if let Some(catalog) = catalog {
            if script.unreachable_catalogs.contains(catalog) {
                return Err(Error::Io(format!("cannot open session for {}", catalog)));
            }
        }
        Ok(Box::new(MockConnection {
            catalog: catalog.map(str::to_string),
            script: self.script.clone(),
        }))
    }
}

#[derive(Debug)]
struct MockConnection {
    catalog: Option<String>,
    script: Arc<Mutex<Script>>,
}

impl SqlConnection for MockConnection {
    fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        let mut script = self.script.lock().unwrap();
        script.issued.push((self.catalog.clone(), sql.to_string()));

        let scoped = self
            .catalog
            .as_ref()
            .and_then(|c| script.scoped.get(&(c.clone(), sql.to_string())));
        match scoped.or_else(|| script.global.get(sql)).cloned() {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::EngineError(msg)) => Err(Error::Database(msg)),
            Some(Reply::TransportError(msg)) => Err(Error::Io(msg)),
            None => Ok(Vec::new()),
        }
    }

    fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }
}

fn to_rows(rows: Vec<Vec<Option<&str>>>) -> Vec<Row> {
    rows.into_iter().map(Row::from).collect()
}

/// Workflow configuration with optional overrides of the connection and
/// source sections.
pub fn config_with(connection_extra: &str, source_config: &str) -> SourceConfig {
    let json = format!(
        r#"{{
            "serviceName": "local_databricks",
            "serviceConnection": {{"config": {{
                "type": "Databricks",
                "hostPort": "adb-1.azuredatabricks.net:443",
                "token": "dapi-test",
                "httpPath": "/sql/1.0/warehouses/abc123"{}
            }}}},
            "sourceConfig": {{"config": {}}}
        }}"#,
        connection_extra, source_config
    );
    SourceConfig::from_json(&json).expect("valid test configuration")
}

pub fn default_config() -> SourceConfig {
    config_with("", "{}")
}
