//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/workbench.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! max_body_bytes = 10485760
//!
//! [paging]
//! default_size = 20
//! max_size = 2000
//!
//! [seed]
//! enabled = false
//! count = 5
//! ```
//!
//! Only `[db].path` is required; every other section has defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Upper bound on request bodies, CSV uploads included.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct PagingConfig {
    #[serde(default = "default_page_size")]
    pub default_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}
fn default_max_page_size() -> u32 {
    2000
}

/// Sample data inserted by `cwb serve` into an empty table.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_seed_count")]
    pub count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            count: default_seed_count(),
        }
    }
}

fn default_seed_count() -> usize {
    5
}

impl Config {
    /// Every default, with the database under `./data`. Starting point for
    /// configs built in code rather than read from a file.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/workbench.sqlite"),
            },
            server: ServerConfig::default(),
            paging: PagingConfig::default(),
            seed: SeedConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.paging.default_size == 0 {
            anyhow::bail!("paging.default_size must be >= 1");
        }
        if self.paging.max_size < self.paging.default_size {
            anyhow::bail!("paging.max_size must be >= paging.default_size");
        }
        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be > 0");
        }
        if self.seed.enabled && self.seed.count == 0 {
            anyhow::bail!("seed.count must be >= 1 when seeding is enabled");
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
