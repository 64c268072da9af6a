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

//! Fully qualified entity names.

/// Quote a name part that contains the separator.
pub fn quote_name(name: &str) -> String {
    if name.contains('.') {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

/// `service.database`, quoting parts that contain a dot.
pub fn build_database_fqn(service_name: &str, database_name: &str) -> String {
    format!("{}.{}", quote_name(service_name), quote_name(database_name))
}

/// `service.database.schema`, quoting parts that contain a dot.
pub fn build_schema_fqn(service_name: &str, database_name: &str, schema_name: &str) -> String {
    format!(
        "{}.{}",
        build_database_fqn(service_name, database_name),
        quote_name(schema_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_fqn() {
        assert_eq!(build_database_fqn("local_databricks", "main"), "local_databricks.main");
    }

    #[test]
    fn test_database_fqn_quotes_dotted_names() {
        assert_eq!(
            build_database_fqn("svc.prod", "my.catalog"),
            "\"svc.prod\".\"my.catalog\""
        );
    }

    #[test]
    fn test_schema_fqn() {
        assert_eq!(
            build_schema_fqn("svc", "hive_metastore", "default"),
            "svc.hive_metastore.default"
        );
    }
}
