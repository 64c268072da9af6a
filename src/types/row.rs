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

//! Untyped result rows.

/// One row of a metadata result.
///
/// The width depends on the statement and on the server variant (for
/// example `SHOW VIEWS` returns one column on Hive and three on Spark), so
/// rows are plain positional tuples. SQL NULL is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<Option<String>>);

impl Row {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self(values)
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field at `index`, or `None` if it is NULL or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|v| v.as_deref())
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.0
    }

    /// Copy of the row with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Row {
        Row(self
            .0
            .iter()
            .map(|v| v.as_deref().map(|s| s.trim().to_string()))
            .collect())
    }
}

impl From<Vec<Option<String>>> for Row {
    fn from(values: Vec<Option<String>>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for Row {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Row {
    fn from(values: Vec<Option<&str>>) -> Self {
        Self(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}
