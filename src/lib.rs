//! Tool Usage Library
//!
//! A reporting library that scans locally stored AI-agent session transcripts
//! (newline-delimited JSON, one record per line) and tallies how often each
//! named tool is invoked. Its purpose is usage auditing: identify heavily used
//! tools versus idle ones so a tool inventory can be pruned.
//!
//! ## Two Extraction Modes
//!
//! - **Exact**: counts structured `toolCall`/`tool_use` content blocks by
//!   their declared tool name
//! - **Fuzzy**: scans the free-text command of `exec` blocks for mentions of
//!   installed skill identifiers (recall over precision)
//!
//! ## Architecture Overview
//!
//! - [`models`] - transcript record shapes, events, and report documents
//! - [`file_discovery`] - transcript and skill-registry enumeration
//! - [`date_filter`] - resolution of date tokens and day windows
//! - [`extractor`] - the two extraction strategies behind one trait
//! - [`aggregator`] - commutative fold of events into per-tool tallies
//! - [`analyzer`] - pipeline orchestration
//! - [`display`] - JSON and terminal report rendering
//! - [`config`] - configuration with file and environment overrides
//! - [`logging`] - structured logging setup
//!
//! ## Main Entry Point
//!
//! ```rust
//! use tool_usage::analyzer::{ScanMode, ScanOptions, ToolUsageAnalyzer};
//!
//! # fn example() -> anyhow::Result<()> {
//! let analyzer = ToolUsageAnalyzer::new();
//! let options = ScanOptions {
//!     mode: ScanMode::ToolCalls,
//!     json_output: true,
//!     verbose: false,
//!     include_sessions: false,
//!     date: None,
//!     days: Some(7),
//! };
//! analyzer.run(&options)?;
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod date_filter;
pub mod display;
pub mod extractor;
pub mod file_discovery;
pub mod logging;
pub mod models;
pub mod timestamp_parser;

pub use analyzer::ToolUsageAnalyzer;
pub use models::*;
