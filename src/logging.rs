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

//! Logging configuration for the metadata source.
//!
//! Initializes a `tracing-subscriber` with file or stderr output.
//!
//! ## Configuration priority
//!
//! 1. `logging.level` / `logging.file` in the workflow configuration (highest)
//! 2. `RUST_LOG` environment variable
//! 3. Default: `warn`
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=databricks_legacy_metadata=debug ./my_ingestion_job
//! ```

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

const LOG_TARGET: &str = "databricks_legacy_metadata";

/// Logging section of the workflow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level: "OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE".
    #[serde(default)]
    pub level: Option<String>,
    /// Log file path. If unset, logs go to stderr.
    #[serde(default)]
    pub file: Option<String>,
}

/// Initialize the tracing subscriber.
///
/// Uses `OnceLock` so this runs at most once per process; the first source
/// constructed configures logging and later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        if let Some(ref level) = config.level {
            if level.eq_ignore_ascii_case("off") {
                return;
            }
        }

        let filter = if let Some(ref level) = config.level {
            EnvFilter::new(format!("{}={}", LOG_TARGET, level.to_lowercase()))
        } else {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", LOG_TARGET)))
        };

        if let Some(ref path) = config.file {
            let file = match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
            {
                Ok(f) => f,
                Err(e) => {
                    eprintln!(
                        "databricks-legacy-metadata: failed to open log file {}: {}",
                        path, e
                    );
                    return;
                }
            };

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_target(false)
                        .with_ansi(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        }
    });
}
