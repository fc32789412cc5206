//! Lymphoid synoptic reporter core library.
//!
//! This crate provides the core functionality for the reporter:
//! - Marker classification (Hans criteria, BCL2/MYC co-expression, hit status)
//! - Report composition for each diagnosis branch
//! - An in-memory form session with derived-field refresh
//! - Plain-text report export
//! - Settings loading, structured logging, and output rendering

pub mod classify;
pub mod compose;
pub mod config;
pub mod exit_codes;
pub mod export;
pub mod logging;
pub mod output;
pub mod schema;
pub mod session;

pub use classify::{classify, ClassificationResult};
pub use compose::{generate_report, Report, ReportComposer};
pub use session::FormSession;
