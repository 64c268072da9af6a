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

//! Data structures for metadata query results.
//!
//! These types represent what the dialect decodes from `DESCRIBE`,
//! `SHOW VIEWS` and `DESCRIBE TABLE EXTENDED` results.

use crate::metadata::type_mapping::SemanticType;

/// One column decoded from a `DESCRIBE` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// The name of the column.
    pub name: String,
    /// Classification of the leading type token.
    pub semantic_type: SemanticType,
    /// `DESCRIBE` does not report nullability; always true.
    pub nullable: bool,
    /// `DESCRIBE` does not report defaults; always `None`.
    pub default_value: Option<String>,
    /// Column comment, if any.
    pub comment: Option<String>,
    /// The type string as reported. For complex types this is the full
    /// nested definition from the per-column `DESCRIBE`.
    pub raw_type_string: String,
    /// STRUCT, ARRAY or MAP.
    pub is_complex: bool,
}

impl ColumnDescriptor {
    /// A simple (non-complex) column.
    pub fn new(
        name: impl Into<String>,
        semantic_type: SemanticType,
        raw_type_string: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            nullable: true,
            default_value: None,
            comment,
            raw_type_string: raw_type_string.into(),
            is_complex: false,
        }
    }

    /// A complex column whose full type came from a per-column `DESCRIBE`.
    pub fn complex(
        name: impl Into<String>,
        semantic_type: SemanticType,
        full_type_string: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            is_complex: true,
            ..Self::new(name, semantic_type, full_type_string, comment)
        }
    }
}

/// Result of a table comment lookup. `text` is `None` when the table has
/// no comment or the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableComment {
    pub text: Option<String>,
}

impl TableComment {
    pub fn new(text: Option<String>) -> Self {
        Self { text }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}
