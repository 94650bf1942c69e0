//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use doc_harvest::HarvestConfig;

/// Download every file linked from a web page that matches a suffix.
///
/// Fetches one page, collects the `href` of every anchor ending with the
/// suffix, resolves them against the page URL and downloads them concurrently.
/// Flags override the config file (`$XDG_CONFIG_HOME/doc-harvest/config.toml`),
/// which overrides built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(author, version, about)]
pub struct Args {
    /// Page to harvest links from
    pub url: Option<String>,

    /// Only download links whose href ends with this suffix (case-sensitive) [default: .doc]
    #[arg(short = 's', long)]
    pub suffix: Option<String>,

    /// Directory to save files to (created if absent) [default: downloads]
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-100) [default: 10]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Request timeout in seconds for the page and each download (1-3600) [default: 30]
    #[arg(short = 't', long = "timeout", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: Option<u64>,

    /// Seconds in-flight downloads may continue after Ctrl-C (0-3600) [default: 10]
    #[arg(short = 'g', long = "grace", value_parser = clap::value_parser!(u64).range(0..=3600))]
    pub grace_secs: Option<u64>,

    /// Config file to load instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List resolved links and destinations without downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Applies flags given on the command line on top of `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: HarvestConfig) -> HarvestConfig {
        if let Some(url) = &self.url {
            config.target_page_url.clone_from(url);
        }
        if let Some(suffix) = &self.suffix {
            config.link_suffix.clone_from(suffix);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_directory.clone_from(output_dir);
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = usize::from(concurrency);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.request_timeout_secs = timeout_secs;
        }
        if let Some(grace_secs) = self.grace_secs {
            config.shutdown_grace_secs = grace_secs;
        }
        config
    }

    /// Default log filter implied by `-v` / `-q`.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["doc-harvest"]).unwrap();
        assert!(args.url.is_none());
        assert!(args.suffix.is_none());
        assert!(!args.dry_run);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.default_log_level(), "info");
    }

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        let args = Args::try_parse_from(["doc-harvest"]).unwrap();
        let config = args.apply_to(HarvestConfig::default());
        assert_eq!(config, HarvestConfig::default());
    }

    #[test]
    fn test_cli_positional_url() {
        let args = Args::try_parse_from(["doc-harvest", "https://example.com/docs"]).unwrap();
        assert_eq!(args.url.as_deref(), Some("https://example.com/docs"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let args = Args::try_parse_from([
            "doc-harvest",
            "https://example.com/docs",
            "-s",
            ".pdf",
            "-o",
            "out",
            "-c",
            "3",
            "--timeout",
            "5",
            "--grace",
            "0",
        ])
        .unwrap();
        let file_config = HarvestConfig {
            link_suffix: ".rtf".to_string(),
            concurrency: 50,
            ..HarvestConfig::default()
        };
        let config = args.apply_to(file_config);
        assert_eq!(config.target_page_url, "https://example.com/docs");
        assert_eq!(config.link_suffix, ".pdf");
        assert_eq!(config.output_directory, PathBuf::from("out"));
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.shutdown_grace_secs, 0);
    }

    #[test]
    fn test_cli_unset_flags_keep_file_values() {
        let args = Args::try_parse_from(["doc-harvest", "-s", ".pdf"]).unwrap();
        let file_config = HarvestConfig {
            output_directory: PathBuf::from("from-file"),
            ..HarvestConfig::default()
        };
        let config = args.apply_to(file_config);
        assert_eq!(config.link_suffix, ".pdf");
        assert_eq!(config.output_directory, PathBuf::from("from-file"));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["doc-harvest", "-v"]).unwrap();
        assert_eq!(args.default_log_level(), "debug");

        let args = Args::try_parse_from(["doc-harvest", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.default_log_level(), "trace");
    }

    #[test]
    fn test_cli_quiet_wins_over_verbose() {
        let args = Args::try_parse_from(["doc-harvest", "-q", "-v"]).unwrap();
        assert_eq!(args.default_log_level(), "error");
    }

    #[test]
    fn test_cli_dry_run_flag() {
        let args = Args::try_parse_from(["doc-harvest", "--dry-run"]).unwrap();
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_concurrency_zero_rejected() {
        let err = Args::try_parse_from(["doc-harvest", "-c", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_concurrency_over_max_rejected() {
        let err = Args::try_parse_from(["doc-harvest", "-c", "101"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let err = Args::try_parse_from(["doc-harvest", "--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_grace_zero_allowed() {
        let args = Args::try_parse_from(["doc-harvest", "-g", "0"]).unwrap();
        assert_eq!(args.grace_secs, Some(0));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["doc-harvest", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["doc-harvest", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["doc-harvest", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
