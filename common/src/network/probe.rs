//! # Probe Results
//!
//! The outcome of probing a single address, and the ordered collection of
//! outcomes produced by one scan.

use std::fmt;

/// Liveness of a host as seen by a single echo probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStatus {
    /// The host answered the probe.
    Active,
    /// No answer, or the probe itself could not be carried out.
    Inactive,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Active => "Active",
            HostStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, HostStatus::Active)
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one target. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    address: String,
    status: HostStatus,
    latency: Option<f64>,
}

impl ProbeResult {
    pub fn new(address: impl Into<String>, status: HostStatus) -> Self {
        Self {
            address: address.into(),
            status,
            latency: None,
        }
    }

    pub fn active(address: impl Into<String>) -> Self {
        Self::new(address, HostStatus::Active)
    }

    pub fn inactive(address: impl Into<String>) -> Self {
        Self::new(address, HostStatus::Inactive)
    }

    /// Attaches a round-trip time in milliseconds.
    pub fn with_latency(mut self, latency_ms: f64) -> Self {
        self.latency = Some(latency_ms);
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn status(&self) -> HostStatus {
        self.status
    }

    /// Round-trip time in milliseconds. Not captured by the ping prober yet,
    /// so this is `None` for every result it produces.
    pub fn latency(&self) -> Option<f64> {
        self.latency
    }
}

/// Ordered probe outcomes for one scan, one entry per enumerated target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    results: Vec<ProbeResult>,
}

impl ScanReport {
    pub fn new(results: Vec<ProbeResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.results.iter()
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn active_count(&self) -> usize {
        self.results.iter().filter(|r| r.status().is_active()).count()
    }

    pub fn has_active(&self) -> bool {
        self.results.iter().any(|r| r.status().is_active())
    }
}

impl<'a> IntoIterator for &'a ScanReport {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl From<Vec<ProbeResult>> for ScanReport {
    fn from(results: Vec<ProbeResult>) -> Self {
        Self::new(results)
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
