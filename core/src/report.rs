//! # Result Reporting
//!
//! Turns a finished [`ScanReport`] into a CSV file and a line-per-host status
//! stream.

use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use sweepr_common::config::Config;
use sweepr_common::error::ScanError;
use sweepr_common::network::probe::ScanReport;
use tempfile::NamedTempFile;
use tracing::debug;

pub const NO_LIVE_HOSTS: &str = "No live hosts found.";

const CSV_HEADER: [&str; 3] = ["IP", "Status", "Ping (ms)"];

/// Mode of the written CSV. Staged temp files start out owner-only.
#[cfg(unix)]
const CSV_MODE: u32 = 0o644;

/// Receives the human-readable status lines of a report.
pub trait StatusSink {
    fn line(&mut self, line: &str);
}

impl StatusSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing answered, so nothing was written.
    NoLiveHosts,
    /// Results were written to this path.
    Saved(PathBuf),
}

pub struct Reporter {
    output_path: PathBuf,
}

impl Reporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.output)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Persists and announces a report.
    ///
    /// With no active host only the no-live-hosts notice is emitted and the
    /// output file is left untouched. Otherwise the CSV replaces whatever was
    /// at the output path, one `<address> <status>` line is emitted per result
    /// and a final line names the file. A failed write is returned after the
    /// per-host lines have been emitted.
    pub fn report<S>(&self, report: &ScanReport, sink: &mut S) -> Result<ReportOutcome, ScanError>
    where
        S: StatusSink + ?Sized,
    {
        if !report.has_active() {
            sink.line(NO_LIVE_HOSTS);
            return Ok(ReportOutcome::NoLiveHosts);
        }

        let saved = self.save(report);

        for result in report {
            sink.line(&format!("{} {}", result.address(), result.status()));
        }

        saved?;
        sink.line(&format!("Results saved to {}", self.output_path.display()));
        Ok(ReportOutcome::Saved(self.output_path.clone()))
    }

    /// Writes next to the destination first and renames over it, so the
    /// output path never holds a half-written file.
    fn save(&self, report: &ScanReport) -> Result<(), ScanError> {
        let dir: &Path = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| ScanError::io(dir, e))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| ScanError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(&mut staged);
            write_csv(report, &mut writer)
                .and_then(|_| writer.flush())
                .map_err(|e| ScanError::io(&self.output_path, e))?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(fs::Permissions::from_mode(CSV_MODE))
                .map_err(|e| ScanError::io(&self.output_path, e))?;
        }

        staged
            .persist(&self.output_path)
            .map_err(|e| ScanError::io(&self.output_path, e.error))?;

        debug!("Wrote {} rows to {}", report.len(), self.output_path.display());
        Ok(())
    }
}

/// Writes the report as CSV: a fixed header, then one row per result in
/// report order. The latency column stays empty until it is measured.
pub fn write_csv<W: Write>(report: &ScanReport, writer: &mut W) -> io::Result<()> {
    write_row(writer, &CSV_HEADER)?;
    for result in report {
        let latency: String = result
            .latency()
            .map(|ms| format!("{ms:.2}"))
            .unwrap_or_default();
        write_row(writer, &[result.address(), result.status().as_str(), latency.as_str()])?;
    }
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let row: Vec<Cow<'_, str>> = fields.iter().map(|field| escape_field(field)).collect();
    write!(writer, "{}\r\n", row.join(","))
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
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
