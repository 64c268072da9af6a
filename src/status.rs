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

//! Run status reported back to the ingestion pipeline.

use crate::error::Error;

/// An entity skipped by a filter pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntity {
    pub name: String,
    pub reason: String,
}

/// An entity that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntity {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceStatus {
    filtered: Vec<FilteredEntity>,
    failures: Vec<FailedEntity>,
}

impl SourceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.filtered.push(FilteredEntity {
            name: name.into(),
            reason: reason.into(),
        });
    }

    pub fn failed(&mut self, name: impl Into<String>, error: &Error) {
        self.failures.push(FailedEntity {
            name: name.into(),
            error: error.to_string(),
        });
    }

    pub fn filtered(&self) -> &[FilteredEntity] {
        &self.filtered
    }

    pub fn failures(&self) -> &[FailedEntity] {
        &self.failures
    }

    pub fn is_filtered(&self, name: &str) -> bool {
        self.filtered.iter().any(|f| f.name == name)
    }
}
