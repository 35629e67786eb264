//! modsync - builds the module catalog for a Magisk-style module repository
//!
//! `modsync sync --user <name>` discovers modules from the user's GitHub
//! repositories; without `--user` the catalog is replayed from
//! `json/hosts.json`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use modsync_core::catalog::{BuildOptions, CatalogBuilder, Credentials};
use modsync_core::host::github::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use modsync_core::host::GitHubClient;
use modsync_core::Settings;

mod logging;

use logging::{LogFormat, LogLevel};

/// Environment variable consulted when --token is not given
const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Parser, Debug)]
#[clap(
    name = "modsync",
    about = "Build a module catalog from GitHub repositories or a local hosts.json",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Project root containing config/config.json and json/hosts.json
    #[clap(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Set log level
    #[clap(long, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Log output format on stderr
    #[clap(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,
}

#[derive(Parser, Debug)]
enum Command {
    /// Build the catalog
    Sync {
        /// GitHub user whose repositories are scanned (local replay if omitted)
        #[clap(long, short)]
        user: Option<String>,

        /// API token (defaults to $GITHUB_TOKEN)
        #[clap(long, short = 'k')]
        token: Option<String>,

        /// GitHub API endpoint
        #[clap(long, default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Repositories processed concurrently; output order is unaffected
        #[clap(long, short, default_value_t = 1)]
        jobs: usize,

        /// Per-request timeout in seconds
        #[clap(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout_secs: u64,

        /// Abort discovery if it takes longer than this many seconds
        #[clap(long)]
        deadline_secs: Option<u64>,

        /// Write the catalog here instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate config/config.json and print the resolved settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration problems are reported before logging exists
    let settings = Settings::load(&cli.root)?;

    logging::initialize_tracing(
        cli.log_level,
        cli.log_format,
        settings.show_log,
        settings.log_dir.as_deref(),
    )?;
    settings.log_summary();

    match cli.command {
        Command::Sync {
            user,
            token,
            api_url,
            jobs,
            timeout_secs,
            deadline_secs,
            output,
        } => {
            let options = BuildOptions {
                concurrency: jobs,
                deadline: deadline_secs.map(Duration::from_secs),
            };
            let token = token.or_else(|| std::env::var(TOKEN_ENV).ok());
            let credentials = user.map(|user| Credentials::new(user, token));

            sync_command(
                &cli.root,
                &settings,
                credentials,
                &api_url,
                Duration::from_secs(timeout_secs),
                options,
                output,
            )
            .await
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(&settings)
                .context("Failed to serialize settings")?;
            println!("{json}");
            Ok(())
        }
    }
}

async fn sync_command(
    root: &std::path::Path,
    settings: &Settings,
    credentials: Option<Credentials>,
    api_url: &str,
    timeout: Duration,
    options: BuildOptions,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut builder = CatalogBuilder::new(root).with_options(options);

    if let Some(credentials) = &credentials {
        debug!("Using GitHub API at {}", api_url);
        let client = GitHubClient::with_options(api_url, credentials.token.clone(), timeout)?;
        builder = builder.with_host(Arc::new(client));
    }

    let catalog = builder.build(settings, credentials.as_ref()).await?;

    match output {
        Some(path) => {
            catalog.write_to(&path)?;
            info!("Wrote {} modules to {}", catalog.size(), path.display());
        }
        None => println!("{}", catalog.to_json()?),
    }

    Ok(())
}
