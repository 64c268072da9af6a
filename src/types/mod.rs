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

//! Shared types.
//!
//! - `sea`: SEA (Statement Execution API) request/response types
//! - `row`: untyped result rows handed to the metadata layer

pub mod row;
pub mod sea;

pub use row::Row;
pub use sea::{
    CreateSessionRequest, CreateSessionResponse, ExecuteStatementRequest, ResultData,
    ResultManifest, ServiceError, StatementExecutionResponse, StatementState, StatementStatus,
};
