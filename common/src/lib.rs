//! Shared building blocks for `sweepr`.
//!
//! * [`network`] holds the scan data model and the target enumerator.
//! * [`config`] is the runtime configuration handed down from the CLI.
//! * [`error`] is the error taxonomy every crate reports through.

pub mod config;
pub mod error;
pub mod network;
