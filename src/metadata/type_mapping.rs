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

//! Hive type token → semantic type mapping.
//!
//! `DESCRIBE` reports column types as free-form strings such as
//! `decimal(10,2)` or `map<int,string>`. Only the leading identifier is
//! used for classification; nested shapes are resolved separately by the
//! column decoder.

use crate::metadata::types::ColumnDescriptor;
use arrow_schema::{DataType, Field, IntervalUnit, Schema, TimeUnit};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::warn;

/// Semantic tag of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Varchar,
    Char,
    Date,
    Timestamp,
    Decimal,
    Binary,
    Struct,
    Array,
    Map,
    Void,
    Interval,
    /// Unknown type token.
    Null,
}

impl SemanticType {
    /// STRUCT, ARRAY and MAP need a second `DESCRIBE` to recover their shape.
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            SemanticType::Struct | SemanticType::Array | SemanticType::Map
        )
    }

    /// Arrow type for this tag. `raw_type` supplies decimal precision/scale.
    pub fn arrow_type(self, raw_type: &str) -> DataType {
        match self {
            SemanticType::Boolean => DataType::Boolean,
            SemanticType::TinyInt => DataType::Int8,
            SemanticType::SmallInt => DataType::Int16,
            SemanticType::Int => DataType::Int32,
            SemanticType::BigInt => DataType::Int64,
            SemanticType::Float => DataType::Float32,
            SemanticType::Double => DataType::Float64,
            SemanticType::Decimal => {
                let (precision, scale) = parse_decimal_params(raw_type);
                DataType::Decimal128(precision, scale)
            }
            SemanticType::String | SemanticType::Varchar | SemanticType::Char => DataType::Utf8,
            SemanticType::Binary => DataType::Binary,
            SemanticType::Date => DataType::Date32,
            SemanticType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            SemanticType::Interval => DataType::Interval(IntervalUnit::DayTime),
            // Nested values are carried as their JSON text
            SemanticType::Struct | SemanticType::Array | SemanticType::Map => DataType::Utf8,
            SemanticType::Void | SemanticType::Null => DataType::Null,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::TinyInt => "TINYINT",
            SemanticType::SmallInt => "SMALLINT",
            SemanticType::Int => "INT",
            SemanticType::BigInt => "BIGINT",
            SemanticType::Float => "FLOAT",
            SemanticType::Double => "DOUBLE",
            SemanticType::String => "STRING",
            SemanticType::Varchar => "VARCHAR",
            SemanticType::Char => "CHAR",
            SemanticType::Date => "DATE",
            SemanticType::Timestamp => "TIMESTAMP",
            SemanticType::Decimal => "DECIMAL",
            SemanticType::Binary => "BINARY",
            SemanticType::Struct => "STRUCT",
            SemanticType::Array => "ARRAY",
            SemanticType::Map => "MAP",
            SemanticType::Void => "VOID",
            SemanticType::Interval => "INTERVAL",
            SemanticType::Null => "NULL",
        };
        f.write_str(name)
    }
}

/// Owned token → tag table.
///
/// Built once per source; lookups are case-insensitive and never fail.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, SemanticType>,
}

const HIVE_PRIMITIVES: &[(&str, SemanticType)] = &[
    ("boolean", SemanticType::Boolean),
    ("tinyint", SemanticType::TinyInt),
    ("smallint", SemanticType::SmallInt),
    ("int", SemanticType::Int),
    ("bigint", SemanticType::BigInt),
    ("float", SemanticType::Float),
    ("double", SemanticType::Double),
    ("string", SemanticType::String),
    ("varchar", SemanticType::Varchar),
    ("char", SemanticType::Char),
    ("date", SemanticType::Date),
    ("timestamp", SemanticType::Timestamp),
    ("decimal", SemanticType::Decimal),
];

const DATABRICKS_EXTRAS: &[(&str, SemanticType)] = &[
    ("struct", SemanticType::Struct),
    ("array", SemanticType::Array),
    ("map", SemanticType::Map),
    ("void", SemanticType::Void),
    ("interval", SemanticType::Interval),
    ("binary", SemanticType::Binary),
];

impl TypeRegistry {
    /// Hive primitives plus the Databricks-specific tags.
    pub fn new() -> Self {
        let mut registry = Self::hive_primitives();
        for (token, semantic) in DATABRICKS_EXTRAS {
            registry.register(token, *semantic);
        }
        registry
    }

    /// Only the base Hive primitive map.
    pub fn hive_primitives() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        for (token, semantic) in HIVE_PRIMITIVES {
            registry.register(token, *semantic);
        }
        registry
    }

    /// Add or replace a token mapping.
    pub fn register(&mut self, token: &str, semantic: SemanticType) {
        self.types.insert(token.to_ascii_lowercase(), semantic);
    }

    /// Tag for `token`; unknown tokens log a warning and map to
    /// [`SemanticType::Null`].
    pub fn resolve(&self, token: &str) -> SemanticType {
        match self.types.get(&token.to_ascii_lowercase()) {
            Some(semantic) => *semantic,
            None => {
                warn!("Did not recognize type '{}'", token);
                SemanticType::Null
            }
        }
    }

    /// Classify a full type string such as `decimal(10,1)` by its leading token.
    pub fn resolve_type_string(&self, type_string: &str) -> SemanticType {
        match leading_type_token(type_string) {
            Some(token) => self.resolve(token),
            None => self.resolve(type_string),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading identifier run of a type string (`^\w+`).
pub fn leading_type_token(type_string: &str) -> Option<&str> {
    static TOKEN: OnceLock<Option<Regex>> = OnceLock::new();
    let re = TOKEN.get_or_init(|| Regex::new(r"^\w+").ok()).as_ref()?;
    re.find(type_string).map(|m| m.as_str())
}

/// Arrow schema of decoded columns. Every field is nullable.
pub fn columns_to_arrow_schema(columns: &[ColumnDescriptor]) -> Schema {
    let fields: Vec<Field> = columns
        .iter()
        .map(|c| {
            Field::new(
                &c.name,
                c.semantic_type.arrow_type(&c.raw_type_string),
                c.nullable,
            )
        })
        .collect();
    Schema::new(fields)
}

/// Parse precision and scale from DECIMAL(p,s) type string.
/// Defaults to DECIMAL(10,0), the Hive default.
fn parse_decimal_params(type_name: &str) -> (u8, i8) {
    let default_precision = 10u8;
    let default_scale = 0i8;

    let Some(start) = type_name.find('(') else {
        return (default_precision, default_scale);
    };
    let Some(end) = type_name.find(')') else {
        return (default_precision, default_scale);
    };
    if end < start {
        return (default_precision, default_scale);
    }

    let mut parts = type_name[start + 1..end].split(',').map(str::trim);
    let precision = parts
        .next()
        .and_then(|p| p.parse::<u8>().ok())
        .unwrap_or(default_precision);
    let scale = parts
        .next()
        .and_then(|s| s.parse::<i8>().ok())
        .unwrap_or(default_scale);

    (precision, scale)
}
