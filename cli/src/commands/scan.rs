use std::future::{self, Future};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{Instrument, error, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::{colors, print, spinner};
use sweepr_common::config::Config;
use sweepr_common::network::probe::ScanReport;
use sweepr_common::network::target::{self, ScanRequest, ScanTarget};
use sweepr_core::report::{ReportOutcome, Reporter, StatusSink};
use sweepr_core::scanner::{PingProber, Prober, Scanner};

const NO_TARGETS: &str = "No targets to scan.";

/// Routes report lines to the terminal.
struct TerminalSink;

impl StatusSink for TerminalSink {
    fn line(&mut self, line: &str) {
        print::print(line);
    }
}

/// How a scan command ended. Every variant exits successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Neither `--range` nor `--file` was given.
    NoTargetSource,
    /// The request could not be expanded, e.g. a malformed range.
    EnumerationFailed,
    /// The request expanded to nothing; no probe was sent.
    NoTargets,
    /// The batch was cancelled or timed out before it finished.
    Abandoned,
    Reported(ReportOutcome),
}

pub async fn scan(range: Option<String>, file: Option<PathBuf>, cfg: &Config) -> anyhow::Result<()> {
    let stop = async {
        if tokio::signal::ctrl_c().await.is_err() {
            future::pending::<()>().await;
        }
    };

    let prober = PingProber::new(cfg.probe_timeout);
    run_scan(range, file, cfg, prober, &mut TerminalSink, stop).await?;
    Ok(())
}

/// Enumerates, probes and reports one scan. `stop` abandons the batch.
async fn run_scan<P, S, F>(
    range: Option<String>,
    file: Option<PathBuf>,
    cfg: &Config,
    prober: P,
    sink: &mut S,
    stop: F,
) -> anyhow::Result<ScanOutcome>
where
    P: Prober + 'static,
    S: StatusSink,
    F: Future<Output = ()>,
{
    let request: ScanRequest = match ScanRequest::from_options(range, file) {
        Ok(request) => request,
        Err(e) => {
            sink.line(&e.to_string());
            return Ok(ScanOutcome::NoTargetSource);
        }
    };

    let targets: Vec<ScanTarget> = match target::enumerate(&request) {
        Ok(targets) => targets,
        Err(e) => {
            error!("{e}");
            return Ok(ScanOutcome::EnumerationFailed);
        }
    };

    if targets.is_empty() {
        sink.line(NO_TARGETS);
        return Ok(ScanOutcome::NoTargets);
    }

    print_plan(&request, targets.len(), cfg);

    let start_time: Instant = Instant::now();
    let Some(report) = probe_all(targets, cfg, prober, stop).await else {
        return Ok(ScanOutcome::Abandoned);
    };

    print::header("scan results", cfg.quiet);
    let outcome: ReportOutcome = Reporter::from_config(cfg).report(&report, sink)?;
    print_summary(&report, start_time.elapsed(), cfg);
    Ok(ScanOutcome::Reported(outcome))
}

/// Runs the batch under a progress spinner.
async fn probe_all<P, F>(targets: Vec<ScanTarget>, cfg: &Config, prober: P, stop: F) -> Option<ScanReport>
where
    P: Prober + 'static,
    F: Future<Output = ()>,
{
    let span = info_span!("scan", indicatif.pb_show = true);
    spinner::attach_progress(&span, targets.len());

    let progress_span = span.clone();
    let scanner = Scanner::from_config(prober, cfg)
        .with_progress(move |done| progress_span.pb_set_position(done as u64));

    let outcome = scanner.run_until(targets, stop).instrument(span).await;
    drop(scanner);

    match outcome {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

fn print_plan(request: &ScanRequest, target_count: usize, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let source: String = match request {
        ScanRequest::Range { cidr } => cidr.clone(),
        ScanRequest::FileList { path } => path.display().to_string(),
    };
    let concurrency: String = cfg
        .concurrency
        .map_or_else(|| "unbounded".to_string(), |n| n.to_string());

    print::aligned_line("Source", source);
    print::aligned_line("Targets", target_count.to_string());
    print::aligned_line("Concurrency", concurrency);
    print::aligned_line("Output", cfg.output.display().to_string());
}

fn print_summary(report: &ScanReport, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let active_hosts: ColoredString = format!("{} of {}", report.active_count(), report.len())
        .bold()
        .green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!("Scan Complete: {active_hosts} hosts alive in {total_time}")
        .color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
