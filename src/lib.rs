pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod services;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
pub use domain::{QuestionSource, TechnologyId};
pub use models::{Difficulty, Question};
pub use services::{QuestionBank, QuestionPipeline};

/// Build the HTTP client used for provider calls.
pub fn build_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("quizsource/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to initialize tracing")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to initialize tracing")?;
    }

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    config.validate()?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Questions {
            technologies,
            count,
            json,
        } => cli::cmd_questions(&config, &technologies, count, json).await,

        Commands::Preload { technologies } => cli::cmd_preload(&config, &technologies).await,

        Commands::Bank { technology, count } => {
            cli::cmd_bank(&technology, count);
            Ok(())
        }

        Commands::Daemon { preload } => cli::cmd_daemon(&config, &preload).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!(
                    "✓ Config file created at {}",
                    Config::default_config_path().display()
                );
            } else {
                println!(
                    "Config file already exists at {}",
                    Config::default_config_path().display()
                );
            }
            Ok(())
        }
    }
}
