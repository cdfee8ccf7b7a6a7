//! Config Command - Configuration management
//!
//! View and modify the whscmd configuration file.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde_json::json;

use crate::config::{CONFIG_TEMPLATE, FileConfig, search_paths, user_config_path};
use crate::constants::{self, LOCAL_CONFIG_FILE};
use crate::context::CliContext;
use crate::error::{CliError, CliResult};
use crate::exit_codes;
use crate::output::OutputFormat;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Show configuration file locations
    Path,
    /// Set a configuration value
    Set(SetArgs),
    /// Initialize a new configuration file
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key (connection.host, connection.port, connection.api_key, output.format)
    pub key: String,
    /// Value to set
    pub value: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Create config in the current directory instead of the user config
    #[arg(long)]
    pub local: bool,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Run the config command
pub async fn run(ctx: &CliContext, args: &ConfigArgs) -> CliResult<i32> {
    match &args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Set(set_args) => set_config(ctx, set_args).await,
        ConfigCommand::Init(init_args) => init_config(ctx, init_args).await,
    }
}

/// Show the effective configuration
fn show_config(ctx: &CliContext) -> CliResult<i32> {
    let conn = &ctx.connection;
    let api_key = conn.api_key.as_deref().map(mask_api_key);

    match ctx.output.format() {
        OutputFormat::Json => {
            let value = json!({
                "config_file": ctx.config_path,
                "connection": {
                    "host": conn.host,
                    "port": conn.port,
                    "api_key": api_key,
                },
                "output": { "format": ctx.output.format() },
            });
            ctx.output
                .json(&value)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }
        OutputFormat::Table => {
            ctx.output.header("Current Configuration");
            match &ctx.config_path {
                Some(path) => ctx.output.print(&format!("file: {}", path.display())),
                None => ctx.output.print("file: (none, using defaults)"),
            }

            ctx.output.print("\n[connection]");
            ctx.output.print(&format!("  host: {}", conn.host));
            ctx.output.print(&format!("  port: {}", conn.port));
            ctx.output.print(&format!(
                "  api_key: {}",
                api_key.as_deref().unwrap_or("(not set)")
            ));

            ctx.output.print("\n[output]");
            ctx.output.print(&format!(
                "  format: {}",
                format_name(ctx.output.format())
            ));

            if !ctx.is_authenticated() {
                ctx.output.warn(&format!(
                    "No API key configured. Pass -k/--apikey or set {}.",
                    constants::ENV_API_KEY
                ));
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Show configuration file locations
fn show_path(ctx: &CliContext) -> CliResult<i32> {
    ctx.output.header("Configuration File Locations");

    if let Some(path) = &ctx.config_path {
        ctx.output.print(&format!("\nIn use: {}", path.display()));
    }

    ctx.output.print("\nSearch order (first found is used):");
    for (i, path) in search_paths().iter().enumerate() {
        let marker = if path.exists() { "✓" } else { " " };
        ctx.output
            .print(&format!("  {} {}. {}", marker, i + 1, path.display()));
    }

    ctx.output.print("\nEnvironment variables:");
    for var in [
        constants::ENV_CONFIG,
        constants::ENV_HOST,
        constants::ENV_PORT,
        constants::ENV_API_KEY,
        constants::ENV_VERBOSITY,
    ] {
        ctx.output.print(&format!("  {}", var));
    }

    Ok(exit_codes::SUCCESS)
}

/// Set a configuration value in the file in use, or the user config
async fn set_config(ctx: &CliContext, args: &SetArgs) -> CliResult<i32> {
    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => default_write_path(false)?,
    };

    let mut config = ctx.file_config.clone();
    apply_setting(&mut config, &args.key, &args.value)?;

    let content = toml::to_string_pretty(&config)
        .map_err(|e| CliError::Config(format!("failed to serialize configuration: {}", e)))?;
    write_config(&path, &content).await?;

    let shown = if args.key == "connection.api_key" {
        mask_api_key(&args.value)
    } else {
        args.value.clone()
    };
    ctx.output.success(&format!("Set {} = {}", args.key, shown));
    ctx.output
        .info(&format!("Config saved to {}", path.display()));

    Ok(exit_codes::SUCCESS)
}

/// Initialize a new configuration file
async fn init_config(ctx: &CliContext, args: &InitArgs) -> CliResult<i32> {
    let path = default_write_path(args.local)?;

    if path.exists() && !args.force {
        return Err(CliError::Config(format!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }

    write_config(&path, CONFIG_TEMPLATE).await?;

    ctx.output
        .success(&format!("Created config file: {}", path.display()));
    ctx.output
        .info("Add your Sentinel API key under [connection] to skip -k on every call");

    Ok(exit_codes::SUCCESS)
}

fn default_write_path(local: bool) -> CliResult<PathBuf> {
    if local {
        return Ok(PathBuf::from(LOCAL_CONFIG_FILE));
    }
    user_config_path()
        .ok_or_else(|| CliError::Config("could not determine the user config directory".into()))
}

async fn write_config(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            CliError::Config(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| CliError::Config(format!("failed to write {}: {}", path.display(), e)))
}

/// Update one dotted key of the configuration
pub fn apply_setting(config: &mut FileConfig, key: &str, value: &str) -> CliResult<()> {
    match key {
        "connection.host" => config.connection.host = Some(value.to_string()),
        "connection.port" => {
            let port = value
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| {
                    CliError::Config(format!("invalid port '{}': expected 1-65535", value))
                })?;
            config.connection.port = Some(port);
        }
        "connection.api_key" => config.connection.api_key = Some(value.to_string()),
        "output.format" => {
            let format = match value.to_ascii_lowercase().as_str() {
                "table" => OutputFormat::Table,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(CliError::Config(format!(
                        "invalid output format '{}': expected table or json",
                        value
                    )));
                }
            };
            config.output.format = Some(format);
        }
        _ => {
            return Err(CliError::Config(format!(
                "unknown configuration key '{}'",
                key
            )));
        }
    }
    Ok(())
}

/// Show only the last four characters of an API key
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Table => "table",
        OutputFormat::Json => "json",
    }
}
