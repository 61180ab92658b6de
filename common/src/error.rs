use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Neither a range nor a target file was supplied.
    #[error("Please specify either --range or --file.")]
    NoTargetSource,

    #[error("invalid range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    #[error("range '{cidr}' holds {hosts} hosts, more than the {limit} a single scan accepts")]
    RangeTooLarge { cidr: String, hosts: u128, limit: u128 },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The batch was stopped from the outside before every probe finished.
    #[error("scan cancelled before all probes completed")]
    Cancelled,

    #[error("scan did not complete within {0:?}")]
    BatchTimedOut(Duration),
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
