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

//! Result parsing for metadata queries.
//!
//! Turns positional [`Row`]s into names, raw column entries and lookup
//! maps. Row layouts follow what Hive and Spark flavoured endpoints return
//! for `DESCRIBE`, `SHOW VIEWS`, `SHOW TABLES` and
//! `DESCRIBE TABLE EXTENDED`.

use crate::types::Row;
use std::collections::HashMap;
use tracing::warn;

/// Header row emitted by some `DESCRIBE` variants.
pub const COLUMN_HEADER: &str = "# col_name";

/// Rows from these markers on describe partitioning, not columns.
pub const PARTITION_MARKERS: &[&str] = &["# Partition Information", "# Partitioning"];

/// A column entry as listed by `DESCRIBE`, before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    pub type_string: String,
    pub comment: Option<String>,
}

/// Trim every field and drop blank and header rows.
pub fn clean_describe_rows(rows: Vec<Row>) -> Vec<Row> {
    rows.iter()
        .map(Row::trimmed)
        .filter(|row| match row.get(0) {
            Some(first) => !first.is_empty() && first != COLUMN_HEADER,
            None => false,
        })
        .collect()
}

/// Column entries of a `DESCRIBE {table}` result, up to the first partition marker.
///
/// A row without a type keeps an empty type string, which resolves to
/// [`SemanticType::Null`](crate::metadata::SemanticType::Null).
pub fn parse_describe_columns(rows: Vec<Row>) -> Vec<RawColumn> {
    let mut columns = Vec::new();
    for row in clean_describe_rows(rows) {
        let name = row.get(0).unwrap_or_default();
        if PARTITION_MARKERS.contains(&name) {
            break;
        }
        let type_string = row.get(1).unwrap_or_else(|| {
            warn!("DESCRIBE row for column '{}' has no type", name);
            ""
        });
        columns.push(RawColumn {
            name: name.to_string(),
            type_string: type_string.to_string(),
            comment: row.get(2).filter(|c| !c.is_empty()).map(str::to_string),
        });
    }
    columns
}

/// `data_type` value of a per-column `DESCRIBE {table} {column}` result.
///
/// That result is a list of `(info_name, info_value)` pairs.
pub fn find_data_type(rows: &[Row]) -> Option<String> {
    rows.iter()
        .find(|row| row.get(0).map(str::trim) == Some("data_type"))
        .and_then(|row| row.get(1))
        .map(|v| v.trim().to_string())
}

/// Server variant of a `SHOW VIEWS` / `SHOW TABLES` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRowShape {
    /// Spark: `(namespace, viewName, isTemporary)`.
    ThreeColumn,
    /// Hive: `(tab_name)`.
    OneColumn,
}

impl ViewRowShape {
    /// Classify by width. Any row wider than one field is the Spark layout.
    pub fn classify(row: &Row) -> Option<Self> {
        match row.len() {
            0 => None,
            1 => Some(ViewRowShape::OneColumn),
            _ => Some(ViewRowShape::ThreeColumn),
        }
    }

    pub fn name_index(self) -> usize {
        match self {
            ViewRowShape::ThreeColumn => 1,
            ViewRowShape::OneColumn => 0,
        }
    }
}

/// Object names of a `SHOW VIEWS` or `SHOW TABLES` result.
pub fn parse_object_names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| {
            let shape = ViewRowShape::classify(row)?;
            row.get(shape.name_index()).map(str::to_string)
        })
        .collect()
}

/// Non-empty first-column values, in server order.
pub fn parse_first_column(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(0))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Table comment from a `DESCRIBE TABLE EXTENDED` result.
pub fn find_table_comment(rows: &[Row]) -> Option<String> {
    rows.iter()
        .find(|row| row.get(0).map(str::trim) == Some("Comment"))
        .and_then(|row| row.get(1))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Key of the view definition cache: lower-cased `(view, schema)`.
pub fn view_key(view: &str, schema: &str) -> (String, String) {
    (view.to_lowercase(), schema.to_lowercase())
}

/// Definitions from the `INFORMATION_SCHEMA.VIEWS` listing, keyed by
/// [`view_key`]. Rows are `(view_name, schema, view_def)`.
pub fn parse_view_definitions(rows: &[Row]) -> HashMap<(String, String), String> {
    rows.iter()
        .filter_map(|row| {
            let view = row.get(0)?;
            let schema = row.get(1)?;
            let definition = row.get(2)?;
            Some((view_key(view, schema), definition.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: Vec<Vec<Option<&str>>>) -> Vec<Row> {
        values.into_iter().map(Row::from).collect()
    }

    #[test]
    fn test_parse_describe_stops_at_partition_information() {
        let input = rows(vec![
            vec![Some("id"), Some("int"), Some("")],
            vec![Some("name"), Some("string"), Some("")],
            vec![Some("# Partition Information"), None, None],
            vec![Some("ds"), Some("string"), Some("")],
        ]);
        let columns = parse_describe_columns(input);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].type_string, "int");
        assert_eq!(columns[0].comment, None);
        assert_eq!(columns[1].name, "name");
        assert_eq!(columns[1].type_string, "string");
    }

    #[test]
    fn test_parse_describe_stops_at_partitioning() {
        let input = rows(vec![
            vec![Some("id"), Some("int"), Some("primary id")],
            vec![Some("# Partitioning"), Some(""), Some("")],
            vec![Some("Part 0"), Some("ds"), Some("")],
            vec![Some("anything"), Some("int"), Some("")],
        ]);
        let columns = parse_describe_columns(input);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].comment.as_deref(), Some("primary id"));
    }

    #[test]
    fn test_parse_describe_drops_header_and_blank_rows() {
        let input = rows(vec![
            vec![Some("# col_name"), Some("data_type"), Some("comment")],
            vec![Some("  id "), Some(" bigint "), None],
            vec![Some(""), Some(""), Some("")],
            vec![None, None, None],
            vec![Some("amount"), Some("decimal(10,2)"), None],
        ]);
        let columns = parse_describe_columns(input);
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "amount"]);
        assert_eq!(columns[0].type_string, "bigint");
    }

    #[test]
    fn test_parse_describe_missing_type_keeps_remaining_columns() {
        let input = rows(vec![
            vec![Some("id")],
            vec![Some("legacy"), None, Some("no type")],
            vec![Some("name"), Some("string"), None],
        ]);
        let columns = parse_describe_columns(input);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].type_string, "");
        assert_eq!(columns[1].type_string, "");
        assert_eq!(columns[1].comment.as_deref(), Some("no type"));
        assert_eq!(columns[2].type_string, "string");
    }

    #[test]
    fn test_find_data_type() {
        let input = rows(vec![
            vec![Some("col_name"), Some("tags")],
            vec![Some("data_type"), Some("map<int,string>")],
            vec![Some("comment"), None],
        ]);
        assert_eq!(find_data_type(&input).as_deref(), Some("map<int,string>"));
        assert_eq!(find_data_type(&input[..1]), None);
    }

    #[test]
    fn test_view_row_shape() {
        let spark = Row::from(vec!["sales", "v_orders", "false"]);
        let hive = Row::from(vec!["v_orders"]);
        assert_eq!(
            ViewRowShape::classify(&spark),
            Some(ViewRowShape::ThreeColumn)
        );
        assert_eq!(ViewRowShape::classify(&hive), Some(ViewRowShape::OneColumn));
        assert_eq!(ViewRowShape::classify(&Row::default()), None);
    }

    #[test]
    fn test_parse_object_names() {
        let three = rows(vec![vec![Some("sales"), Some("v_orders"), Some("false")]]);
        assert_eq!(parse_object_names(&three), vec!["v_orders"]);

        let one = rows(vec![vec![Some("v_orders")], vec![Some("v_customers")]]);
        assert_eq!(parse_object_names(&one), vec!["v_orders", "v_customers"]);
    }

    #[test]
    fn test_parse_first_column() {
        let input = rows(vec![
            vec![Some("main")],
            vec![Some("")],
            vec![None],
            vec![Some("hive_metastore")],
        ]);
        assert_eq!(parse_first_column(&input), vec!["main", "hive_metastore"]);
    }

    #[test]
    fn test_find_table_comment() {
        let input = rows(vec![
            vec![Some("id"), Some("int"), None],
            vec![Some(""), Some(""), Some("")],
            vec![Some("# Detailed Table Information"), Some(""), Some("")],
            vec![Some("Comment   "), Some("all orders"), Some("")],
            vec![Some("Comment"), Some("second"), Some("")],
        ]);
        assert_eq!(find_table_comment(&input).as_deref(), Some("all orders"));
        assert_eq!(find_table_comment(&input[..3]), None);
    }

    #[test]
    fn test_parse_view_definitions() {
        let input = rows(vec![
            vec![Some("V_Orders"), Some("Sales"), Some("SELECT * FROM orders")],
            vec![Some("broken"), Some("sales"), None],
        ]);
        let defs = parse_view_definitions(&input);
        assert_eq!(defs.len(), 1);
        assert_eq!(
            defs.get(&view_key("v_orders", "SALES")).map(String::as_str),
            Some("SELECT * FROM orders")
        );
    }
}
