//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// FollowerTally - compare public figures by total followers
///
/// Sums follower counts across Twitter, Facebook and Instagram for each
/// figure. Without flags it runs the bundled demo against fixture data.
///
/// Examples:
///   followertally
///   followertally --format json
///   followertally --live --config figures.toml
///   TWITTER_BEARER_TOKEN=... followertally --live
///   followertally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Query the real platform APIs instead of the bundled fixtures
    ///
    /// Platforms without a token are skipped.
    #[arg(long)]
    pub live: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .followertally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fetch figures concurrently
    ///
    /// Totals and their order are the same as in sequential mode.
    #[arg(long)]
    pub concurrent: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Twitter API v2 bearer token
    #[arg(long, value_name = "TOKEN", env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    pub twitter_token: Option<String>,

    /// Facebook Graph API access token
    #[arg(long, value_name = "TOKEN", env = "FACEBOOK_ACCESS_TOKEN", hide_env_values = true)]
    pub facebook_token: Option<String>,

    /// Instagram Graph API access token
    #[arg(long, value_name = "TOKEN", env = "INSTAGRAM_ACCESS_TOKEN", hide_env_values = true)]
    pub instagram_token: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .followertally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per figure (default)
    #[default]
    Text,
    /// JSON document with per-platform breakdown
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            live: false,
            config: None,
            format: OutputFormat::Text,
            output: None,
            concurrent: false,
            timeout: None,
            twitter_token: None,
            facebook_token: None,
            instagram_token: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_no_flags_runs_demo() {
        let args = Args::try_parse_from(["followertally"]).unwrap();
        assert!(!args.live);
        assert!(!args.concurrent);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "followertally",
            "--live",
            "--format",
            "json",
            "--concurrent",
            "--timeout",
            "10",
            "--twitter-token",
            "tw",
        ])
        .unwrap();
        assert!(args.live);
        assert!(args.concurrent);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.timeout, Some(10));
        assert_eq!(args.twitter_token.as_deref(), Some("tw"));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_config() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
