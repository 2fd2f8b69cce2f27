//! Command line configuration and logging setup.

use crate::data::DEFAULT_CSV;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "login_dash", version, about = "Login Activity Dashboard")]
pub struct Cli {
    /// CSV file with login events
    #[arg(default_value = DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Print the aggregated report as JSON and exit
    #[arg(long, conflicts_with = "export")]
    pub summary: bool,

    /// Render the charts as PNG files into DIR and exit
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Log level or tracing filter directive
    #[arg(long, env = "LOGIN_DASH_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// True when no window should be opened.
    pub fn is_headless(&self) -> bool {
        self.summary || self.export.is_some()
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `info` if `log_level` is not a valid filter.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_working_directory_csv() {
        let cli = Cli::try_parse_from(["login_dash"]).unwrap();
        assert_eq!(cli.csv, PathBuf::from(DEFAULT_CSV));
        assert!(!cli.summary);
        assert!(cli.export.is_none());
        assert!(!cli.is_headless());
    }

    #[test]
    fn headless_modes() {
        let cli = Cli::try_parse_from(["login_dash", "data.csv", "--summary"]).unwrap();
        assert_eq!(cli.csv, PathBuf::from("data.csv"));
        assert!(cli.is_headless());

        let cli = Cli::try_parse_from(["login_dash", "--export", "out"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("out")));
        assert!(cli.is_headless());
    }

    #[test]
    fn summary_and_export_conflict() {
        assert!(Cli::try_parse_from(["login_dash", "--summary", "--export", "out"]).is_err());
    }
}
