use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Where results land when `--output` is not given.
pub const DEFAULT_OUTPUT_PATH: &str = "data/results/resultat.csv";

/// Single-attempt timeout handed to the platform `ping`.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file written when at least one host answers.
    ///
    /// Any existing file at this path is replaced.
    pub output: PathBuf,
    /// How long a single probe waits for an echo reply.
    pub probe_timeout: Duration,
    /// Maximum number of probes in flight. `None` launches every probe at once.
    pub concurrency: Option<NonZeroUsize>,
    /// Upper bound for the whole batch. When it elapses every outstanding
    /// probe is abandoned together and no report is produced.
    pub batch_timeout: Option<Duration>,
    pub no_banner: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: None,
            batch_timeout: None,
            no_banner: false,
            quiet: 0,
        }
    }
}
