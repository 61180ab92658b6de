#![cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::error::ScanError;
use sweepr_common::network::probe::{HostStatus, ProbeResult, ScanReport};
use sweepr_common::network::target::{self, ScanRequest, ScanTarget};
use sweepr_core::report::{ReportOutcome, Reporter, NO_LIVE_HOSTS};
use sweepr_core::scanner::{ProbeError, Prober, Scanner};

/// Answers from a fixed table. Earlier targets answer later, so completion
/// order is the reverse of target order.
struct TableProber {
    answers: HashMap<String, HostStatus>,
}

impl TableProber {
    fn new(answers: &[(&str, HostStatus)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(addr, status)| (addr.to_string(), *status))
                .collect(),
        }
    }
}

#[async_trait]
impl Prober for TableProber {
    async fn probe(&self, target: &ScanTarget) -> Result<ProbeResult, ProbeError> {
        let last_octet: u64 = target
            .as_str()
            .rsplit('.')
            .next()
            .and_then(|o| o.parse().ok())
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(last_octet * 10))).await;

        let status = self
            .answers
            .get(target.as_str())
            .copied()
            .unwrap_or(HostStatus::Inactive);
        Ok(ProbeResult::new(target.as_str(), status))
    }
}

fn write_targets(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("ips.txt");
    fs::write(&path, content).unwrap();
    path
}

async fn scan_and_report(
    request: &ScanRequest,
    prober: TableProber,
    output: &Path,
) -> (ScanReport, Result<ReportOutcome, ScanError>, Vec<String>) {
    let targets = target::enumerate(request).unwrap();
    let report = Scanner::new(prober).run(targets).await.unwrap();
    let mut lines: Vec<String> = Vec::new();
    let outcome = Reporter::new(output).report(&report, &mut lines);
    (report, outcome, lines)
}

#[tokio::test]
async fn file_scan_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let request = ScanRequest::FileList {
        path: write_targets(dir.path(), "10.0.0.1\n10.0.0.2\n\n"),
    };
    let output = dir.path().join("data").join("results").join("resultat.csv");
    let prober = TableProber::new(&[
        ("10.0.0.1", HostStatus::Active),
        ("10.0.0.2", HostStatus::Inactive),
    ]);

    let (report, outcome, lines) = scan_and_report(&request, prober, &output).await;

    assert_eq!(
        report,
        ScanReport::new(vec![
            ProbeResult::active("10.0.0.1"),
            ProbeResult::inactive("10.0.0.2"),
        ])
    );
    assert_eq!(outcome.unwrap(), ReportOutcome::Saved(output.clone()));

    let csv = fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows, vec!["IP,Status,Ping (ms)", "10.0.0.1,Active,", "10.0.0.2,Inactive,"]);

    assert_eq!(
        lines,
        vec![
            "10.0.0.1 Active".to_string(),
            "10.0.0.2 Inactive".to_string(),
            format!("Results saved to {}", output.display()),
        ]
    );
}

#[tokio::test]
async fn range_scan_keeps_ascending_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("resultat.csv");
    let request = ScanRequest::Range {
        cidr: "192.168.1.0/29".to_string(),
    };
    let prober = TableProber::new(&[("192.168.1.4", HostStatus::Active)]);

    let (report, outcome, _) = scan_and_report(&request, prober, &output).await;

    let addresses: Vec<&str> = report.iter().map(ProbeResult::address).collect();
    assert_eq!(
        addresses,
        vec![
            "192.168.1.1",
            "192.168.1.2",
            "192.168.1.3",
            "192.168.1.4",
            "192.168.1.5",
            "192.168.1.6",
        ]
    );
    assert_eq!(report.active_count(), 1);
    assert!(outcome.is_ok());
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 7);
}

#[tokio::test]
async fn all_inactive_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results").join("resultat.csv");
    let request = ScanRequest::Range {
        cidr: "192.168.1.0/30".to_string(),
    };

    let (report, outcome, lines) = scan_and_report(&request, TableProber::new(&[]), &output).await;

    assert_eq!(report.len(), 2);
    assert_eq!(outcome.unwrap(), ReportOutcome::NoLiveHosts);
    assert_eq!(lines, vec![NO_LIVE_HOSTS.to_string()]);
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_file_enumerates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let request = ScanRequest::FileList {
        path: dir.path().join("nonexistent.txt"),
    };

    let targets = target::enumerate(&request).unwrap();
    assert!(targets.is_empty());

    let report = Scanner::new(TableProber::new(&[])).run(targets).await.unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn duplicates_in_file_are_probed_separately() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("resultat.csv");
    let request = ScanRequest::FileList {
        path: write_targets(dir.path(), "10.0.0.3\n10.0.0.3\n  10.0.0.1\n"),
    };
    let prober = TableProber::new(&[("10.0.0.3", HostStatus::Active)]);

    let (report, _, lines) = scan_and_report(&request, prober, &output).await;

    assert_eq!(report.len(), 3);
    assert_eq!(&lines[..3], &["10.0.0.3 Active", "10.0.0.3 Active", "10.0.0.1 Inactive"]);
}

#[test]
fn missing_source_is_a_configuration_error() {
    let err = ScanRequest::from_options(None, None).unwrap_err();
    assert!(matches!(err, ScanError::NoTargetSource));
    assert_eq!(err.to_string(), "Please specify either --range or --file.");
}

#[test]
fn invalid_range_is_reported() {
    let request = ScanRequest::Range {
        cidr: "192.168.1.0/40".to_string(),
    };
    assert!(matches!(
        target::enumerate(&request),
        Err(ScanError::InvalidRange { .. })
    ));
}
