//! CLI definition using clap.
//!
//! Every scaling parameter can be given on the command line; flags win
//! over values from the config file.

use clap::Parser;
use std::path::PathBuf;

/// Autoscaler - steps replica count to keep CPU utilization near target
#[derive(Parser, Debug)]
#[command(name = "autoscaler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug-level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Base URL of the application, e.g. http://target-app-url
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Target high-priority CPU utilization (0.0-1.0)
    #[arg(short, long)]
    pub target_cpu: Option<f64>,

    /// Half-width of the no-action band around the target (0.0-1.0)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Seconds between polls
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Replica floor applied when scaling down
    #[arg(short, long)]
    pub min_replicas: Option<u32>,

    /// Replicas added or removed per cycle
    #[arg(long)]
    pub step: Option<u32>,

    /// Per-request HTTP timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Log decisions without writing replica counts
    #[arg(long)]
    pub dry_run: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["autoscaler"]).unwrap();
        assert!(cli.base_url.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["autoscaler", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["autoscaler", "-c", "/etc/autoscaler.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/etc/autoscaler.yml")));
    }

    #[test]
    fn test_cli_scaling_flags() {
        let cli = Cli::try_parse_from([
            "autoscaler",
            "--base-url",
            "http://target-app-url",
            "--target-cpu",
            "0.6",
            "--tolerance",
            "0.1",
            "--interval",
            "30",
            "--min-replicas",
            "3",
            "--step",
            "2",
            "--timeout-ms",
            "1500",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://target-app-url"));
        assert_eq!(cli.target_cpu, Some(0.6));
        assert_eq!(cli.tolerance, Some(0.1));
        assert_eq!(cli.interval, Some(30));
        assert_eq!(cli.min_replicas, Some(3));
        assert_eq!(cli.step, Some(2));
        assert_eq!(cli.timeout_ms, Some(1500));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::try_parse_from(["autoscaler", "-u", "http://a", "-t", "0.5", "-i", "10", "-m", "1"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://a"));
        assert_eq!(cli.target_cpu, Some(0.5));
        assert_eq!(cli.interval, Some(10));
        assert_eq!(cli.min_replicas, Some(1));
    }

    #[test]
    fn test_cli_mode_flags() {
        let cli = Cli::try_parse_from(["autoscaler", "--dry-run", "--once"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.once);
    }

    #[test]
    fn test_cli_rejects_bad_number() {
        assert!(Cli::try_parse_from(["autoscaler", "--interval", "soon"]).is_err());
        assert!(Cli::try_parse_from(["autoscaler", "--min-replicas", "-1"]).is_err());
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["autoscaler", "--version"]);
        assert!(result.is_err());
    }
}
