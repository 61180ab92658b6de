//! Scanning engine for `sweepr`.
//!
//! * [`scanner`] probes targets concurrently and builds the ordered report.
//! * [`report`] writes the report to CSV and the status stream.

pub mod report;
pub mod scanner;
