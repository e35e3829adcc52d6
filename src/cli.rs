//! Command line interface
//!
//! Flags and their environment variables override values from the YAML
//! configuration file, which in turn overrides the built-in defaults.

use crate::config::{AppConfig, StorageBackend};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "biztime", version, about = "Company and invoice REST API")]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "BIZTIME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "BIZTIME_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BIZTIME_PORT")]
    pub port: Option<u16>,

    /// Storage backend: in_memory or postgres
    #[arg(short, long, env = "BIZTIME_BACKEND")]
    pub backend: Option<StorageBackend>,

    /// Database connection string
    #[arg(short, long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Cli {
    /// Load the configuration file (if any) and apply the flags on top
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::from_yaml_file(path)?,
            None => AppConfig::default(),
        };
        Ok(self.apply(config))
    }

    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(url) = &self.database_url {
            config.storage.database_url = Some(url.clone());
        }
        config
    }
}
