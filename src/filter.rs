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

//! Include/exclude filtering of entity names.
//!
//! Patterns are regexes anchored at the start of the name and matched
//! case-insensitively. When any include is configured, a name is kept
//! exactly when it matches one of them and excludes are not consulted.
//! Otherwise a name matching any exclude is filtered out.

use crate::config::FilterPattern;
use crate::error::Result;
use regex::{Regex, RegexBuilder};

/// A [`FilterPattern`] with every regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl CompiledFilter {
    pub fn new(pattern: &FilterPattern) -> Result<Self> {
        Ok(Self {
            includes: compile_all(&pattern.includes)?,
            excludes: compile_all(&pattern.excludes)?,
        })
    }

    /// Compile an optional pattern from configuration.
    pub fn from_config(pattern: Option<&FilterPattern>) -> Result<Option<Self>> {
        pattern.map(Self::new).transpose()
    }

    /// True when `name` should be skipped.
    pub fn is_filtered(&self, name: &str) -> bool {
        if !self.includes.is_empty() {
            return !self.includes.iter().any(|re| re.is_match(name));
        }
        self.excludes.iter().any(|re| re.is_match(name))
    }
}

/// True when `name` should be skipped.
pub fn filter_by_pattern(pattern: Option<&CompiledFilter>, name: &str) -> bool {
    pattern.is_some_and(|p| p.is_filtered(name))
}

/// True when the database (catalog) `name` should be skipped.
pub fn filter_by_database(pattern: Option<&CompiledFilter>, name: &str) -> bool {
    filter_by_pattern(pattern, name)
}

/// True when the schema `name` should be skipped.
pub fn filter_by_schema(pattern: Option<&CompiledFilter>, name: &str) -> bool {
    filter_by_pattern(pattern, name)
}

/// Compile `pattern` anchored at the start of the name.
pub fn compile_prefix(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&format!("^(?:{})", pattern))
        .case_insensitive(true)
        .build()?)
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| compile_prefix(p)).collect()
}
