//! whscmd - command-line client for the WhiteHat Sentinel API
//!
//! Maps `whscmd <resource> <action> [arg1] [arg2]` onto the Sentinel REST
//! collections (users, sites, applications, vulnerability classes and custom
//! vulnerability scoring policies). Every invocation issues one HTTPS request
//! authenticated by an API key passed as the `key` query parameter, then
//! renders the JSON response as a table or as raw JSON.
//!
//! ## Layers
//! - [`api_client`]: the four HTTP verbs, returning `(status, body)`
//! - [`resources`]: static descriptors of each REST collection
//! - [`application`]: argument validation and the generic resource client
//! - [`commands`]: routing by action keyword and console rendering

pub mod api_client;
pub mod application;
pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod output;
pub mod resources;

pub use api_client::{ApiResponse, ConnectionConfig, SentinelClient};
pub use application::request::ActionRequest;
pub use application::resource_client::ResourceClient;
pub use context::CliContext;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, OutputWriter};

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::exit_policy;
use crate::commands::ResourceArgs;

const USER_HELP: &str = "Actions:
  list [user_id]                  list the specified user or all users
  create <json_file>              create a user from a JSON file
  update <user_id> <json_file>    update an existing user
  delete <user_id>                delete the specified user";

const SITE_HELP: &str = "Actions:
  list [site_id]                  list the specified site or all sites
  create <json_file>              create a site from a JSON file
  update <site_id> <json_file>    update an existing site
  delete <site_id>                delete the specified site
  entry_points <site_id>          list the crawl entry points of a site";

const APP_HELP: &str = "Actions:
  list [app_id]                   list the specified application or all applications
  entry_points <app_id>           list the crawl entry points of an application";

const VULN_CLASS_HELP: &str = "Actions:
  list <client_id>                list all vulnerability classes for the client";

const VULN_POLICY_HELP: &str = "Actions:
  list [policy_id]                list the specified scoring policy or all policies
  create <json_file>              create a policy from a JSON file
  update <policy_id> <json_file>  update an existing policy
  delete <policy_id>              delete the specified policy
  apply <policy_id> <json_file>   apply the policy to the sites and apps in the JSON file
  fetch <policy_id>               fetch the sites/apps where the policy is applied";

/// whscmd - a utility for interfacing with the WhiteHat Sentinel API
#[derive(Parser, Debug)]
#[command(
    name = "whscmd",
    version,
    about = "A utility for interfacing with the WhiteHat Sentinel API",
    long_about = "whscmd maps sub-commands onto the WhiteHat Sentinel REST API: users, sites, \
                  applications, vulnerability classes and custom vulnerability scoring policies.\n\n\
                  Every request is authenticated with your Sentinel API key (-k/--apikey)."
)]
pub struct Cli {
    /// Output verbosity
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = Verbosity::Error,
        global = true,
        env = constants::ENV_VERBOSITY
    )]
    pub verbosity: Verbosity,

    /// Alternate Sentinel host (default: sentinel.whitehatsec.com)
    #[arg(short = 't', long, global = true, env = constants::ENV_HOST)]
    pub host: Option<String>,

    /// Sentinel API key. THIS IS REQUIRED.
    #[arg(
        short = 'k',
        long,
        global = true,
        env = constants::ENV_API_KEY,
        hide_env_values = true
    )]
    pub apikey: Option<String>,

    /// Alternate Sentinel port (default: 443)
    #[arg(short, long, global = true, env = constants::ENV_PORT)]
    pub port: Option<u16>,

    /// Output format (default: table)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(long, global = true, env = constants::ENV_CONFIG)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    #[command(after_help = USER_HELP)]
    User(ResourceArgs),

    /// Manage sites
    #[command(after_help = SITE_HELP)]
    Site(ResourceArgs),

    /// Manage applications
    #[command(after_help = APP_HELP)]
    App(ResourceArgs),

    /// Manage vulnerability classes
    #[command(name = "vuln_class", after_help = VULN_CLASS_HELP)]
    VulnClass(ResourceArgs),

    /// Manage custom vulnerability scoring policies
    #[command(name = "vuln_policy", after_help = VULN_POLICY_HELP)]
    VulnPolicy(ResourceArgs),

    /// Configuration management
    #[command(visible_alias = "cfg")]
    Config(commands::config::ConfigArgs),
}

/// Log verbosity levels
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Everything, including raw request and response data
    Verbose,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
    /// No log output at all
    Silent,
}

impl Verbosity {
    /// Tracing filter directive for this level
    pub fn directive(&self) -> String {
        let krate = env!("CARGO_CRATE_NAME");
        match self {
            Verbosity::Verbose => format!("info,{}=trace", krate),
            Verbosity::Debug => format!("warn,{}=debug", krate),
            Verbosity::Info => format!("warn,{}=info", krate),
            Verbosity::Warn => "warn".to_string(),
            Verbosity::Error => "error".to_string(),
            Verbosity::Silent => "off".to_string(),
        }
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    context: CliContext,
}

impl CliApp {
    /// Create a new CLI application instance from parsed arguments
    pub fn new(cli: Cli) -> CliResult<Self> {
        let context = CliContext::new(&cli)?;
        Ok(Self { cli, context })
    }

    /// Run the CLI application, returning the process exit code
    pub async fn run(self) -> anyhow::Result<i32> {
        let ctx = &self.context;

        let result = match &self.cli.command {
            Commands::User(args) => commands::records::run(ctx, &resources::USER, args).await,
            Commands::Site(args) => commands::records::run(ctx, &resources::SITE, args).await,
            Commands::App(args) => commands::records::run(ctx, &resources::APP, args).await,
            Commands::VulnClass(args) => {
                commands::records::run(ctx, &resources::VULN_CLASS, args).await
            }
            Commands::VulnPolicy(args) => commands::vuln_policy::run(ctx, args).await,
            Commands::Config(args) => commands::config::run(ctx, args).await,
        };

        Ok(match result {
            Ok(code) => code,
            Err(err) => report_error(&err),
        })
    }
}

/// Log an error and map it to its exit code
pub fn report_error(err: &CliError) -> i32 {
    tracing::error!("{}", err);
    let code = exit_policy::error_exit_code(err);
    if exit_policy::is_usage_exit(code) {
        tracing::info!("run 'whscmd <resource> --help' for the valid actions and arguments");
    }
    code
}

/// Exit codes for scripting
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The server answered with a non-2xx status
    pub const REQUEST_FAILED: i32 = 1;
    /// Unknown action, missing or invalid argument, bad configuration
    pub const USAGE_ERROR: i32 = 2;
    /// Network or TLS error
    pub const NETWORK_ERROR: i32 = 3;
    /// Payload file could not be read or is not a JSON object
    pub const INPUT_ERROR: i32 = 4;
    /// No API key supplied
    pub const AUTH_REQUIRED: i32 = 5;
    /// The server's response was not the expected JSON
    pub const RESPONSE_ERROR: i32 = 6;
}
