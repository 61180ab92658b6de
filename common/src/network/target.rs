//! # Scan Targets
//!
//! Defines where the addresses of a scan come from and expands them into the
//! individual targets to probe.
//!
//! A request is either:
//! * A CIDR block (e.g., `192.168.1.0/24`), expanded to its usable hosts.
//! * A text file with one address per line.

use std::fmt;
use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::ScanError;
use crate::network::range;

/// One address scheduled for probing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The parsed address, if the target is a literal IPv4/IPv6 address.
    pub fn ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IpAddr> for ScanTarget {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl From<&str> for ScanTarget {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The source of addresses for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    /// Every usable host of a CIDR block.
    Range { cidr: String },
    /// One address per non-blank line of a text file.
    FileList { path: PathBuf },
}

impl ScanRequest {
    /// Builds a request from the two mutually exclusive CLI options.
    ///
    /// A range takes precedence when both are supplied.
    pub fn from_options(range: Option<String>, file: Option<PathBuf>) -> Result<Self, ScanError> {
        match (range, file) {
            (Some(cidr), Some(path)) => {
                warn!("Both --range and --file given, ignoring {}", path.display());
                Ok(ScanRequest::Range { cidr })
            }
            (Some(cidr), None) => Ok(ScanRequest::Range { cidr }),
            (None, Some(path)) => Ok(ScanRequest::FileList { path }),
            (None, None) => Err(ScanError::NoTargetSource),
        }
    }
}

/// Expands a request into its targets, in a deterministic order.
///
/// A missing target file is reported and yields no targets rather than an
/// error, so the caller can treat it as an empty scan.
pub fn enumerate(request: &ScanRequest) -> Result<Vec<ScanTarget>, ScanError> {
    let targets = match request {
        ScanRequest::Range { cidr } => range::cidr_hosts(cidr)?
            .to_iter()
            .map(ScanTarget::from)
            .collect::<Vec<ScanTarget>>(),
        ScanRequest::FileList { path } => match read_target_file(path) {
            Ok(targets) => targets,
            Err(ScanError::FileNotFound(path)) => {
                error!("File not found: {}", path.display());
                Vec::new()
            }
            Err(e) => return Err(e),
        },
    };

    let len: usize = targets.len();
    let unit: &str = if len == 1 { "target has" } else { "targets have" };
    info!("{len} {unit} been enumerated");

    Ok(targets)
}

/// Reads targets from a file, one per line.
///
/// Blank lines are skipped and every other line is trimmed. File order and
/// duplicates are kept.
pub fn read_target_file(path: &Path) -> Result<Vec<ScanTarget>, ScanError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScanError::FileNotFound(path.to_path_buf()),
        _ => ScanError::io(path, e),
    })?;

    Ok(parse_target_lines(&content))
}

fn parse_target_lines(content: &str) -> Vec<ScanTarget> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ScanTarget::new)
        .collect()
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
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Records the level and message of every event.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<(Level, String)>>>);

    impl LogCapture {
        fn events(&self) -> Vec<(Level, String)> {
            self.0.lock().unwrap().clone()
        }
    }

    impl<S: Subscriber> Layer<S> for LogCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut message = MessageField::default();
            event.record(&mut message);
            self.0.lock().unwrap().push((*event.metadata().level(), message.0));
        }
    }

    #[derive(Default)]
    struct MessageField(String);

    impl Visit for MessageField {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    fn strings(targets: &[ScanTarget]) -> Vec<&str> {
        targets.iter().map(ScanTarget::as_str).collect()
    }

    #[test]
    fn test_enumerate_range() {
        let request = ScanRequest::Range {
            cidr: "192.168.1.0/30".to_string(),
        };
        let targets = enumerate(&request).unwrap();
        assert_eq!(strings(&targets), vec!["192.168.1.1", "192.168.1.2"]);
    }

    #[test]
    fn test_enumerate_invalid_range() {
        let request = ScanRequest::Range {
            cidr: "192.168.1.0/99".to_string(),
        };
        assert!(matches!(enumerate(&request), Err(ScanError::InvalidRange { .. })));
    }

    #[test]
    fn test_enumerate_file_keeps_order_and_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "10.0.0.2\n\n  10.0.0.1  \n10.0.0.2\n   \nnot-an-ip\n").unwrap();

        let request = ScanRequest::FileList {
            path: file.path().to_path_buf(),
        };
        let targets = enumerate(&request).unwrap();
        assert_eq!(
            strings(&targets),
            vec!["10.0.0.2", "10.0.0.1", "10.0.0.2", "not-an-ip"]
        );
    }

    #[test]
    fn test_enumerate_missing_file_is_empty() {
        let request = ScanRequest::FileList {
            path: PathBuf::from("nonexistent.txt"),
        };
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::registry().with(logs.clone());

        let targets = tracing::subscriber::with_default(subscriber, || enumerate(&request)).unwrap();

        assert!(targets.is_empty());
        assert!(
            logs.events()
                .contains(&(Level::ERROR, "File not found: nonexistent.txt".to_string())),
            "got {:?}",
            logs.events()
        );
    }

    #[test]
    fn test_read_target_file_reports_missing_file() {
        let result = read_target_file(Path::new("does_not_exist.txt"));
        assert!(matches!(result, Err(ScanError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_target_lines_handles_crlf() {
        let targets = parse_target_lines("10.0.0.1\r\n10.0.0.2\r\n\r\n");
        assert_eq!(strings(&targets), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_request_from_options() {
        assert!(matches!(
            ScanRequest::from_options(None, None),
            Err(ScanError::NoTargetSource)
        ));
        assert_eq!(
            ScanRequest::from_options(None, Some(PathBuf::from("ips.txt"))).unwrap(),
            ScanRequest::FileList {
                path: PathBuf::from("ips.txt")
            }
        );
        assert_eq!(
            ScanRequest::from_options(
                Some("10.0.0.0/30".to_string()),
                Some(PathBuf::from("ips.txt"))
            )
            .unwrap(),
            ScanRequest::Range {
                cidr: "10.0.0.0/30".to_string()
            }
        );
    }

    #[test]
    fn test_scan_target_ip() {
        assert!(ScanTarget::new(" 10.0.0.1 ").ip().is_some());
        assert!(ScanTarget::new("::1").ip().is_some());
        assert!(ScanTarget::new("router.local").ip().is_none());
    }
}
