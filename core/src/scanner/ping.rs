//! An **ICMP echo** prober built on the platform `ping` utility.
//!
//! Each probe sends exactly one echo request with a short timeout. The
//! utility blocks until it gives up, so it runs on tokio's blocking pool and
//! never stalls the scheduler.

use std::process::{Command, Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::network::probe::{HostStatus, ProbeResult};
use sweepr_common::network::target::ScanTarget;
use tracing::debug;

use super::{ProbeError, Prober};

/// Fields that only appear in a genuine echo reply.
const LIVE_MARKERS: &[&str] = &["ttl=", "hlim="];

const PING_PROGRAM: &str = "ping";

#[derive(Debug, Clone)]
pub struct PingProber {
    timeout: Duration,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, target: &ScanTarget) -> Result<ProbeResult, ProbeError> {
        let args: Vec<String> = ping_args(target, self.timeout)?;
        let address: String = target.as_str().to_string();

        let output = tokio::task::spawn_blocking(move || run_ping(&args))
            .await
            .map_err(|e| ProbeError::Worker {
                target: address.clone(),
                reason: e.to_string(),
            })?;

        let status = match output {
            Ok(output) => {
                if !output.status.success() {
                    debug!("ping {address} exited with {}", output.status);
                }
                classify(&String::from_utf8_lossy(&output.stdout))
            }
            Err(e) => {
                debug!("Could not launch {PING_PROGRAM} for {address}: {e}");
                HostStatus::Inactive
            }
        };

        Ok(ProbeResult::new(address, status))
    }
}

fn run_ping(args: &[String]) -> std::io::Result<Output> {
    Command::new(PING_PROGRAM)
        .args(args)
        .stdin(Stdio::null())
        .output()
}

/// Decides liveness from the text a ping run printed.
///
/// A reply carries the remaining hop count (`ttl=` on most systems, `hlim=`
/// for IPv6 on macOS). Timeouts and unreachable messages never do.
pub fn classify(output: &str) -> HostStatus {
    let lower = output.to_lowercase();
    if LIVE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        HostStatus::Active
    } else {
        HostStatus::Inactive
    }
}

/// Builds the single-attempt argument list for this platform.
///
/// Fails only when the target could not be handed to `ping` safely.
fn ping_args(target: &ScanTarget, timeout: Duration) -> Result<Vec<String>, ProbeError> {
    let address = target.as_str();
    let malformed = address.is_empty()
        || address.starts_with('-')
        || address.chars().any(|c| c.is_whitespace() || c.is_control());
    if malformed {
        return Err(ProbeError::MalformedTarget(address.to_string()));
    }

    let mut args: Vec<String> = platform_flags(timeout);
    args.push(address.to_string());
    Ok(args)
}

#[cfg(target_os = "windows")]
fn platform_flags(timeout: Duration) -> Vec<String> {
    vec!["-n".into(), "1".into(), "-w".into(), wait_millis(timeout).to_string()]
}

// The BSD family takes the reply wait in milliseconds.
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
fn platform_flags(timeout: Duration) -> Vec<String> {
    vec!["-c".into(), "1".into(), "-W".into(), wait_millis(timeout).to_string()]
}

// OpenBSD has no per-reply wait; `-w` bounds the wait after the last request.
#[cfg(target_os = "openbsd")]
fn platform_flags(timeout: Duration) -> Vec<String> {
    vec!["-c".into(), "1".into(), "-w".into(), wait_secs(timeout).to_string()]
}

// iputils, busybox and NetBSD take whole seconds.
#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "openbsd"
)))]
fn platform_flags(timeout: Duration) -> Vec<String> {
    vec!["-c".into(), "1".into(), "-W".into(), wait_secs(timeout).to_string()]
}

// Each platform only uses one of the two units.
#[allow(dead_code)]
fn wait_millis(timeout: Duration) -> u128 {
    timeout.as_millis().max(1)
}

/// Rounds up so a sub-second timeout never becomes a zero wait.
#[allow(dead_code)]
fn wait_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    secs.max(1)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
