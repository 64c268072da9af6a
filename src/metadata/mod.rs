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

//! Metadata queries against Hive-metastore backed endpoints.
//!
//! ## Module Structure
//!
//! - `types`: Decoded column and comment values
//! - `type_mapping`: Type token registry and Arrow mapping
//! - `sql`: SQL command builder for metadata queries
//! - `parse`: Row layouts of `SHOW`/`DESCRIBE` results
//! - `version`: Legacy vs. catalog-aware detection
//! - `dialect`: The dialect strategy and the per-catalog inspector

pub mod dialect;
pub mod parse;
pub mod sql;
pub mod type_mapping;
pub mod types;
pub mod version;

// Re-export commonly used types
pub use dialect::{DatabricksDialect, InfoCache, Inspector, MetadataDialect};
pub use parse::ViewRowShape;
pub use sql::SqlCommandBuilder;
pub use type_mapping::{columns_to_arrow_schema, leading_type_token, SemanticType, TypeRegistry};
pub use types::{ColumnDescriptor, TableComment};
pub use version::MetastoreGeneration;
