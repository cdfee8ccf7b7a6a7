//! Shared constants for the CLI application
//!
//! This module contains global constants used across the application to ensure
//! consistency and avoid magic strings.

/// Default Sentinel host
pub const DEFAULT_HOST: &str = "sentinel.whitehatsec.com";

/// Default Sentinel port (HTTPS)
pub const DEFAULT_PORT: u16 = 443;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User agent string
pub const USER_AGENT: &str = concat!("whscmd/", env!("CARGO_PKG_VERSION"));

/// Name of the query parameter carrying the API key
pub const API_KEY_PARAM: &str = "key";

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = ".whscmd.toml";

/// Environment variable names
pub const ENV_API_KEY: &str = "WHS_APIKEY";
pub const ENV_HOST: &str = "WHS_HOST";
pub const ENV_PORT: &str = "WHS_PORT";
pub const ENV_CONFIG: &str = "WHS_CONFIG";
pub const ENV_VERBOSITY: &str = "WHS_VERBOSITY";
