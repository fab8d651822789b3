//! CLI, settings and the import pipeline
//!
//! This crate provides the `calimport` command-line interface.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

pub use cli::Cli;
pub use config::{ClientConfig, Settings};
pub use error::{ClientResult, ImportError};
pub use pipeline::{
    EXIT_PARTIAL_FAILURE, EventOutcome, ResolvedCalendar, RunOutcome, RunReport, build_payload,
    create_event, resolve_calendar, run, run_import,
};
