//! Configuration file
//!
//! Optional TOML file supplying connection defaults. Flags and environment
//! variables override anything set here.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::LOCAL_CONFIG_FILE;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub connection: ConnectionSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

/// Template written by `config init`
pub const CONFIG_TEMPLATE: &str = r#"# whscmd configuration
# Command-line flags and WHS_* environment variables take precedence.

[connection]
host = "sentinel.whitehatsec.com"
port = 443
# api_key = "your-sentinel-api-key"

[output]
# table or json
format = "table"
"#;

impl FileConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the first file
    /// found on the search path is used, and finding none yields defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        for path in search_paths() {
            if path.is_file() {
                tracing::debug!("Using config file {:?}", path);
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read configuration from {:?}: {}", path, e))
        })?;
        Self::parse(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {:?}: {}", path, e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Configuration file search order (first found is used)
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(path) = user_config_path() {
        paths.push(path);
    }
    paths
}

/// Per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "whitehatsec", "whscmd").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_template_parses() {
        let config = FileConfig::parse(CONFIG_TEMPLATE).unwrap();
        assert_eq!(
            config.connection.host.as_deref(),
            Some("sentinel.whitehatsec.com")
        );
        assert_eq!(config.connection.port, Some(443));
        assert_eq!(config.connection.api_key, None);
        assert_eq!(config.output.format, Some(OutputFormat::Table));
    }

    #[test]
    fn test_partial_config() {
        let config = FileConfig::parse("[connection]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.connection.api_key.as_deref(), Some("abc"));
        assert_eq!(config.connection.host, None);
        assert_eq!(config.output, OutputSection::default());
    }

    #[test]
    fn test_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\nhost = \"localhost\"\nport = 8443").unwrap();

        let (config, path) = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.connection.host.as_deref(), Some("localhost"));
        assert_eq!(config.connection.port, Some(8443));
        assert_eq!(path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_explicit_file_errors() {
        let err = FileConfig::load(Some(Path::new("/nonexistent/whscmd.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[connection\nhost = ").unwrap();
        let err = FileConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
