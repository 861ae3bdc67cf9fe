use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where tracing output goes. The terminal belongs to the table, so
    /// nothing is logged unless this is set.
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub columns: ColumnWidths,
}

impl Config {
    /// Read the config file if one was given, otherwise fall back to the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        match self.log_level.as_deref() {
            None => Ok(LevelFilter::INFO),
            Some(level) => level
                .parse()
                .with_context(|| format!("invalid log level {level:?}")),
        }
    }
}

/// Widths of the five table columns, in terminal cells.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnWidths {
    pub id: u16,
    pub name: u16,
    pub image: u16,
    pub status: u16,
    pub ports: u16,
}

impl ColumnWidths {
    /// Widths in column order.
    pub fn as_array(&self) -> [u16; 5] {
        [self.id, self.name, self.image, self.status, self.ports]
    }
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            id: 12,
            name: 20,
            image: 25,
            status: 20,
            ports: 30,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about)]
/// dtable shows the containers currently running on the local docker daemon in an interactive
/// terminal table. The daemon is found the same way the docker CLI finds it, through DOCKER_HOST,
/// DOCKER_CERT_PATH and DOCKER_TLS_VERIFY. The list is fetched once at startup; press q to quit.
pub struct Cli {
    /// Path to an optional YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
