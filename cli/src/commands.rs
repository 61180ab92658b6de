pub mod scan;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use sweepr_common::config::{Config, DEFAULT_OUTPUT_PATH};

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(version, about = "A concurrent host-liveness scanner.")]
pub struct CommandLine {
    /// IP range to scan (e.g., 192.168.1.0/24)
    #[arg(long, value_name = "CIDR")]
    pub range: Option<String>,
    /// File containing IP addresses to scan, one per line
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Where the CSV results are written
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
    /// How long a single probe waits for a reply, in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = 1000)]
    pub timeout: u64,
    /// Maximum number of probes in flight (unbounded when omitted)
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<NonZeroUsize>,
    /// Give up on the whole scan after this many seconds
    #[arg(long, value_name = "SECS")]
    pub batch_timeout: Option<u64>,
    /// Reduce output, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            output: self.output.clone(),
            probe_timeout: Duration::from_millis(self.timeout),
            concurrency: self.concurrency,
            batch_timeout: self.batch_timeout.map(Duration::from_secs),
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cmd = CommandLine::try_parse_from(["sweepr", "--range", "10.0.0.0/30"]).unwrap();
        let cfg = cmd.to_config();

        assert_eq!(cmd.range.as_deref(), Some("10.0.0.0/30"));
        assert!(cmd.file.is_none());
        assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(cfg.probe_timeout, Duration::from_secs(1));
        assert!(cfg.concurrency.is_none());
        assert!(cfg.batch_timeout.is_none());
    }

    #[test]
    fn test_no_source_still_parses() {
        let cmd = CommandLine::try_parse_from(["sweepr"]).unwrap();
        assert!(cmd.range.is_none());
        assert!(cmd.file.is_none());
    }

    #[test]
    fn test_overrides() {
        let cmd = CommandLine::try_parse_from([
            "sweepr",
            "--file",
            "ips.txt",
            "--output",
            "out/scan.csv",
            "--timeout",
            "250",
            "--concurrency",
            "16",
            "--batch-timeout",
            "30",
            "-qq",
        ])
        .unwrap();
        let cfg = cmd.to_config();

        assert_eq!(cmd.file, Some(PathBuf::from("ips.txt")));
        assert_eq!(cfg.output, PathBuf::from("out/scan.csv"));
        assert_eq!(cfg.probe_timeout, Duration::from_millis(250));
        assert_eq!(cfg.concurrency, NonZeroUsize::new(16));
        assert_eq!(cfg.batch_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.quiet, 2);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(CommandLine::try_parse_from(["sweepr", "--range", "10.0.0.0/30", "-c", "0"]).is_err());
    }
}
