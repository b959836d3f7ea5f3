// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Diagnostic logging.
//!
//! The terminal belongs to the user interface, so log output goes to a file
//! beneath the data directory instead.

use std::{fs::OpenOptions, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Installs the global `tracing` subscriber.
///
/// The configured level is the default filter, `RUST_LOG` overrides it.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// has already been installed.
pub fn init(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,musicbox={}", config.log_level)));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    Ok(())
}
