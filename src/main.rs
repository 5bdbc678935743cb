//! FollowerTally - compare public figures by total social-media followers
//!
//! A CLI tool that queries Twitter, Facebook and Instagram connectors for
//! each figure and prints the summed follower counts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (transport failure, bad config, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod connectors;
mod models;
mod report;

use analysis::AnalysisPlatform;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use connectors::{
    FacebookConnector, FacebookFixture, InstagramConnector, InstagramFixture, TwitterConnector,
    TwitterFixture,
};
use indicatif::{ProgressBar, ProgressStyle};
use models::PublicFigure;
use report::RunMode;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("FollowerTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .followertally.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    eprintln!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    eprintln!("   Add tokens and [[figures]] entries, then run with --live.");
    Ok(())
}

/// Initialize logging on stderr so stdout only carries the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the comparison and emit the report.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid configuration")?;

    let (mode, platform) = if args.live {
        (RunMode::Live, live_platform(&config)?)
    } else {
        (RunMode::Demo, demo_platform())
    };

    let configured = platform.configured_platforms();
    if configured.is_empty() {
        warn!("No connectors configured; every figure will total 0");
    } else {
        info!(
            "Connectors: {}",
            configured
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let figures = if config.figures.is_empty() {
        debug!("No figures configured, using demo figures");
        demo_figures()
    } else {
        config.figures.clone()
    };

    let spinner = fetch_spinner(&args, mode, figures.len());

    let output = match args.format {
        OutputFormat::Text => {
            let totals = if args.concurrent {
                platform.compare_followers_concurrent(&figures).await
            } else {
                platform.compare_followers(&figures).await
            };
            spinner.finish_and_clear();
            report::generate_text_report(&totals?)
        }
        OutputFormat::Json => {
            let tallies = if args.concurrent {
                platform.tally_all_concurrent(&figures).await
            } else {
                platform.tally_all(&figures).await
            };
            spinner.finish_and_clear();
            let tallies = tallies?;
            let totals = analysis::platform::totals_from_tallies(&tallies);
            let report = report::build_report(mode, configured, totals, tallies);
            report::generate_json_report(&report)?
        }
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Spinner on stderr while live profiles are fetched.
fn fetch_spinner(args: &Args, mode: RunMode, figure_count: usize) -> ProgressBar {
    if args.quiet || mode == RunMode::Demo {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching profiles for {} figures...", figure_count));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Fixture connectors for the bundled demo.
fn demo_platform() -> AnalysisPlatform {
    AnalysisPlatform::new()
        .with_twitter(TwitterFixture::demo())
        .with_facebook(FacebookFixture::demo())
        .with_instagram(InstagramFixture::demo())
}

fn demo_figures() -> Vec<PublicFigure> {
    vec![
        PublicFigure::new("Figura1")
            .with_twitter("user1")
            .with_facebook("fb1")
            .with_instagram("ig1"),
        PublicFigure::new("Figura2")
            .with_twitter("user2")
            .with_facebook("fb2")
            .with_instagram("ig2"),
    ]
}

/// HTTP connectors for every platform that has a token.
fn live_platform(config: &Config) -> Result<AnalysisPlatform> {
    let timeout = config.http.timeout_seconds;
    let mut platform = AnalysisPlatform::new();

    if let Some(token) = config.twitter.token() {
        let connector = TwitterConnector::with_base_url(token, timeout, &config.twitter.base_url)
            .context("Failed to create Twitter connector")?;
        platform = platform.with_twitter(connector);
    }

    if let Some(token) = config.facebook.token() {
        let connector = FacebookConnector::with_base_url(
            token,
            timeout,
            &config.facebook.base_url,
            &config.facebook.api_version,
        )
        .context("Failed to create Facebook connector")?;
        platform = platform.with_facebook(connector);
    }

    if let Some(token) = config.instagram.token() {
        let connector =
            InstagramConnector::with_base_url(token, timeout, &config.instagram.base_url)
                .context("Failed to create Instagram connector")?;
        platform = platform.with_instagram(connector);
    }

    Ok(platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_output() {
        let totals = demo_platform()
            .compare_followers(&demo_figures())
            .await
            .unwrap();
        assert_eq!(
            report::generate_text_report(&totals),
            "Figura1: 2300 seguidores totales\nFigura2: 3400 seguidores totales\n"
        );
    }

    #[tokio::test]
    async fn test_run_rejects_zero_timeout_from_config_file() {
        use clap::Parser;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[http]\ntimeout_seconds = 0\n").unwrap();

        let args = Args::try_parse_from(["followertally", "--config", path.to_str().unwrap()])
            .unwrap();
        let err = run(args).await.unwrap_err();
        assert!(format!("{err:#}").contains("timeout_seconds"));
    }

    #[test]
    fn test_live_platform_skips_missing_tokens() {
        let mut config = Config::default();
        config.facebook.access_token = Some("fb".to_string());

        let platform = live_platform(&config).unwrap();
        assert_eq!(
            platform.configured_platforms(),
            vec![models::Platform::Facebook]
        );
    }

    #[test]
    fn test_live_platform_rejects_bad_base_url() {
        let mut config = Config::default();
        config.twitter.bearer_token = Some("tw".to_string());
        config.twitter.base_url = "::not a url::".to_string();

        assert!(live_platform(&config).is_err());
    }

    #[test]
    fn test_live_platform_without_tokens_is_empty() {
        let platform = live_platform(&Config::default()).unwrap();
        assert!(platform.configured_platforms().is_empty());
    }
}
