//! vapi-sync command line
//!
//! Argument parsing, configuration resolution and process exit codes for the
//! `vapi-sync` binary. Values resolve flag first, then environment variable,
//! then default. Empty values count as missing.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use vapi_sync_client::{ClientConfig, HttpClient, DEFAULT_BASE_URL};
use vapi_sync_engine::{Credentials, MigrationConfig, Migrator, SyncError, DEFAULT_MAPPING_FILE};

/// Source account credential variable
pub const SOURCE_KEY_ENV: &str = "VAPI_SOURCE_API_KEY";
/// Destination account credential variable
pub const DEST_KEY_ENV: &str = "VAPI_DEST_API_KEY";
/// API base URL variable
pub const BASE_URL_ENV: &str = "VAPI_BASE_URL";

/// Exit code for runtime failures
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for configuration and usage errors
pub const EXIT_USAGE: i32 = 2;

/// Invalid command line input, detected before any I/O
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("assistant id is required")]
    MissingAssistantId,

    #[error("{flag} or {env} is required")]
    MissingCredential {
        flag: &'static str,
        env: &'static str,
    },
}

/// Build the clap command
#[must_use]
pub fn command() -> Command {
    Command::new("vapi-sync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate an assistant and its tools and structured outputs to another account")
        .arg(
            Arg::new("assistant-id")
                .value_name("ASSISTANT_ID")
                .required(true)
                .help("Source assistant to migrate"),
        )
        .arg(
            Arg::new("mapping-file")
                .long("mapping-file")
                .value_name("PATH")
                .default_value(DEFAULT_MAPPING_FILE)
                .help("Source-to-destination ID mapping, read and rewritten every run"),
        )
        .arg(
            Arg::new("source-key")
                .long("source-key")
                .value_name("KEY")
                .env(SOURCE_KEY_ENV)
                .hide_env_values(true)
                .help("Source account API key"),
        )
        .arg(
            Arg::new("dest-key")
                .long("dest-key")
                .value_name("KEY")
                .env(DEST_KEY_ENV)
                .hide_env_values(true)
                .help("Destination account API key"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .env(BASE_URL_ENV)
                .help("API base URL [default: https://api.vapi.ai]"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the migration report as JSON"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
}

/// Raw command line values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub assistant_id: String,
    pub mapping_file: PathBuf,
    pub source_key: Option<String>,
    pub dest_key: Option<String>,
    pub base_url: Option<String>,
    pub json: bool,
    pub log_json: bool,
    pub verbose: bool,
}

impl CliConfig {
    /// Collect values from parsed matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();
        Self {
            assistant_id: string("assistant-id").unwrap_or_default(),
            mapping_file: string("mapping-file")
                .map_or_else(|| PathBuf::from(DEFAULT_MAPPING_FILE), PathBuf::from),
            source_key: string("source-key"),
            dest_key: string("dest-key"),
            base_url: string("base-url"),
            json: matches.get_flag("json"),
            log_json: matches.get_flag("log-json"),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Resolve into the assistant ID and a complete migration configuration
    ///
    /// # Errors
    /// [`ConfigError`] naming the first missing input
    pub fn resolve(&self) -> Result<(String, MigrationConfig), ConfigError> {
        let assistant_id = self.assistant_id.trim();
        if assistant_id.is_empty() {
            return Err(ConfigError::MissingAssistantId);
        }

        let source = present(self.source_key.as_deref()).ok_or(ConfigError::MissingCredential {
            flag: "--source-key",
            env: SOURCE_KEY_ENV,
        })?;
        let destination =
            present(self.dest_key.as_deref()).ok_or(ConfigError::MissingCredential {
                flag: "--dest-key",
                env: DEST_KEY_ENV,
            })?;
        let base_url = present(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        let config = MigrationConfig::new(Credentials::new(source, destination))
            .with_base_url(base_url)
            .with_mapping_path(self.mapping_file.clone());

        Ok((assistant_id.to_string(), config))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
pub fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run one migration and render its report
///
/// # Errors
/// Configuration, transport, mapping-file or synchronization failure
pub async fn run(cli: &CliConfig) -> anyhow::Result<String> {
    let (assistant_id, config) = cli.resolve()?;

    let client = HttpClient::new(ClientConfig::new(&config.base_url))
        .context("failed to build HTTP client")?;
    let migrator = Migrator::from_config(client, &config)?;

    tracing::info!(
        assistant_id = %assistant_id,
        mapping_file = %migrator.store().path().display(),
        base_url = %config.base_url,
        "starting migration"
    );
    let report = migrator.migrate_assistant(&assistant_id).await?;
    tracing::info!(
        created = report.created(),
        updated = report.updated(),
        destination = %report.destination_assistant_id,
        "migration complete"
    );

    if cli.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.to_string())
    }
}

/// Process exit code for a failed run
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        return EXIT_USAGE;
    }
    match err.downcast_ref::<SyncError>() {
        Some(sync) if sync.is_configuration() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}
