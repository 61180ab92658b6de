//! The central **abstraction** for liveness scanning.
//!
//! A [`Prober`] checks one target; the [`Scanner`] fans a prober out across
//! every target of a scan and folds the outcomes into a [`ScanReport`].
//!
//! **Architectural Note:**
//! The scanner only depends on the [`Prober`] trait. The production
//! implementation shells out to the platform `ping` ([`PingProber`]), tests
//! substitute their own.

use std::future::{self, Future};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::config::Config;
use sweepr_common::error::ScanError;
use sweepr_common::network::probe::{ProbeResult, ScanReport};
use sweepr_common::network::target::ScanTarget;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

mod ping;

pub use ping::{PingProber, classify};

/// Reasons a probe could not be carried out at all.
///
/// Anything that merely fails to get an answer is reported as an inactive
/// [`ProbeResult`] instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("target '{0}' cannot be probed")]
    MalformedTarget(String),

    #[error("probe worker for '{target}' failed: {reason}")]
    Worker { target: String, reason: String },
}

/// Checks whether a single target is alive.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &ScanTarget) -> Result<ProbeResult, ProbeError>;
}

type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Runs one probe per target concurrently and collects the results in target order.
pub struct Scanner<P> {
    prober: Arc<P>,
    concurrency: Option<NonZeroUsize>,
    batch_timeout: Option<Duration>,
    on_probe_done: Option<ProgressCallback>,
}

impl<P: Prober + 'static> Scanner<P> {
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
            concurrency: None,
            batch_timeout: None,
            on_probe_done: None,
        }
    }

    pub fn from_config(prober: P, cfg: &Config) -> Self {
        Self::new(prober)
            .with_concurrency(cfg.concurrency)
            .with_batch_timeout(cfg.batch_timeout)
    }

    /// Caps the number of probes in flight. `None` launches all of them at once.
    pub fn with_concurrency(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.concurrency = limit;
        self
    }

    pub fn with_batch_timeout(mut self, limit: Option<Duration>) -> Self {
        self.batch_timeout = limit;
        self
    }

    /// Registers a callback receiving the number of probes finished so far.
    pub fn with_progress<F>(mut self, on_probe_done: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_probe_done = Some(Arc::new(on_probe_done));
        self
    }

    /// Probes every target and waits for all of them.
    ///
    /// The report holds exactly one result per target, at the target's index.
    pub async fn run(&self, targets: Vec<ScanTarget>) -> Result<ScanReport, ScanError> {
        self.run_until(targets, future::pending::<()>()).await
    }

    /// Like [`Scanner::run`], but abandons the whole batch once `stop` resolves
    /// or the batch timeout elapses. Outstanding probes are aborted together
    /// and no partial report is returned.
    pub async fn run_until<F>(&self, targets: Vec<ScanTarget>, stop: F) -> Result<ScanReport, ScanError>
    where
        F: Future<Output = ()>,
    {
        if targets.is_empty() {
            return Ok(ScanReport::default());
        }

        let gate: Option<Arc<Semaphore>> = self.concurrency.map(|n| Arc::new(Semaphore::new(n.get())));
        let finished: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

        debug!("Launching {} probes", targets.len());
        let handles: Vec<JoinHandle<ProbeResult>> = targets
            .iter()
            .cloned()
            .map(|target| self.launch(target, gate.clone(), finished.clone()))
            .collect();
        let abort_handles: Vec<AbortHandle> = handles.iter().map(JoinHandle::abort_handle).collect();

        let batch = collect_in_order(&targets, handles);
        let limit = self.batch_timeout;
        let deadline = async move {
            match limit {
                Some(limit) => {
                    tokio::time::sleep(limit).await;
                    limit
                }
                None => future::pending().await,
            }
        };

        tokio::select! {
            biased;
            results = batch => Ok(ScanReport::new(results)),
            limit = deadline => {
                abort_all(&abort_handles);
                Err(ScanError::BatchTimedOut(limit))
            }
            _ = stop => {
                abort_all(&abort_handles);
                Err(ScanError::Cancelled)
            }
        }
    }

    fn launch(
        &self,
        target: ScanTarget,
        gate: Option<Arc<Semaphore>>,
        finished: Arc<AtomicUsize>,
    ) -> JoinHandle<ProbeResult> {
        let prober = Arc::clone(&self.prober);
        let on_probe_done = self.on_probe_done.clone();

        tokio::spawn(async move {
            let _permit = match gate {
                Some(gate) => gate.acquire_owned().await.ok(),
                None => None,
            };

            let result = match prober.probe(&target).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("{e}, marking it inactive");
                    ProbeResult::inactive(target.as_str())
                }
            };

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(callback) = on_probe_done {
                callback(done);
            }
            result
        })
    }
}

/// Joins the probe tasks in target order, so completion order never leaks
/// into the report.
async fn collect_in_order(targets: &[ScanTarget], handles: Vec<JoinHandle<ProbeResult>>) -> Vec<ProbeResult> {
    let mut results: Vec<ProbeResult> = Vec::with_capacity(handles.len());
    for (target, handle) in targets.iter().zip(handles) {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Probe task for {target} did not finish ({e}), marking it inactive");
                ProbeResult::inactive(target.as_str())
            }
        };
        results.push(result);
    }
    results
}

fn abort_all(handles: &[AbortHandle]) {
    let outstanding = handles.iter().filter(|h| !h.is_finished()).count();
    debug!("Aborting {outstanding} outstanding probes");
    handles.iter().for_each(AbortHandle::abort);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
