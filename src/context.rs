//! CLI Context - explicit per-invocation state
//!
//! Connection settings, output writer and the loaded configuration file are
//! resolved once from flags, environment and config file, then passed into
//! every command.

use std::path::PathBuf;

use crate::Cli;
use crate::api_client::{ConnectionConfig, SentinelClient};
use crate::config::FileConfig;
use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::CliResult;
use crate::output::{OutputFormat, OutputWriter};

/// Lightweight context for CLI operations
pub struct CliContext {
    /// Resolved host, port and API key
    pub connection: ConnectionConfig,

    /// Output writer configured based on CLI flags
    pub output: OutputWriter,

    /// Configuration file contents (defaults when no file was found)
    pub file_config: FileConfig,

    /// Path of the configuration file in use, if any
    pub config_path: Option<PathBuf>,
}

impl CliContext {
    /// Create a new CLI context from parsed CLI arguments
    pub fn new(cli: &Cli) -> CliResult<Self> {
        let (file_config, config_path) = FileConfig::load(cli.config.as_deref())?;
        Ok(Self::from_parts(cli, file_config, config_path))
    }

    /// Merge flags over file configuration over defaults
    pub fn from_parts(cli: &Cli, file_config: FileConfig, config_path: Option<PathBuf>) -> Self {
        let connection = ConnectionConfig {
            host: cli
                .host
                .clone()
                .or_else(|| file_config.connection.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli
                .port
                .or(file_config.connection.port)
                .unwrap_or(DEFAULT_PORT),
            api_key: cli
                .apikey
                .clone()
                .or_else(|| file_config.connection.api_key.clone()),
        };

        let format = cli
            .format
            .or(file_config.output.format)
            .unwrap_or(OutputFormat::Table);

        Self {
            connection,
            output: OutputWriter::new(format),
            file_config,
            config_path,
        }
    }

    /// Check if an API key is configured
    pub fn is_authenticated(&self) -> bool {
        self.connection
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Create an API client from current context state
    ///
    /// This is the single construction path for command modules.
    pub fn create_api_client(&self) -> CliResult<SentinelClient> {
        SentinelClient::new(&self.connection)
    }
}
