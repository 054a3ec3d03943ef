//! Usage Analysis Engine
//!
//! This module orchestrates the report pipeline. [`ToolUsageAnalyzer`] wires
//! the stages together and owns the single pass over the corpus:
//!
//! 1. **Discovery**: enumerate transcript files (and, in fuzzy mode, the
//!    installed skill registry)
//! 2. **Date filtering**: admit or drop whole sessions by their derived date
//! 3. **Extraction**: turn each admitted line into zero or more events via
//!    the mode's [`EventExtractor`]
//! 4. **Aggregation**: fold events into a [`UsageAggregate`]
//! 5. **Reporting**: hand the aggregate to [`DisplayManager`]
//!
//! Processing is synchronous and single-pass; the aggregate is the only
//! mutable state and it lives entirely within one run.

use crate::aggregator::UsageAggregate;
use crate::date_filter::DateFilter;
use crate::display::DisplayManager;
use crate::extractor::{CommandScanExtractor, EventExtractor, ToolCallExtractor};
use crate::file_discovery::FileDiscovery;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::debug;

/// Which extraction strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Exact mode: structured `toolCall`/`tool_use` blocks.
    ToolCalls,
    /// Fuzzy mode: scan `exec` command text against installed skills.
    SkillCommands,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub mode: ScanMode,
    pub json_output: bool,
    pub verbose: bool,
    pub include_sessions: bool,
    pub date: Option<String>,
    pub days: Option<i64>,
}

pub struct ToolUsageAnalyzer {
    discovery: FileDiscovery,
    display: DisplayManager,
}

impl Default for ToolUsageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolUsageAnalyzer {
    pub fn new() -> Self {
        Self::with_discovery(FileDiscovery::new())
    }

    /// Build against an explicit discovery, bypassing global config
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self {
            discovery,
            display: DisplayManager::new(),
        }
    }

    /// Run the full pipeline and produce the aggregate plus the filter it
    /// was scoped by. Malformed lines contribute nothing and never fail
    /// the run.
    pub fn aggregate(&self, options: &ScanOptions) -> Result<(UsageAggregate, DateFilter)> {
        let filter = DateFilter::resolve(options.date.as_deref(), options.days);
        let sessions = self.discovery.find_session_files()?;

        let (extractor, mut aggregate): (Box<dyn EventExtractor>, UsageAggregate) =
            match options.mode {
                ScanMode::ToolCalls => (Box::new(ToolCallExtractor), UsageAggregate::new()),
                ScanMode::SkillCommands => {
                    let skills = self.discovery.find_installed_skills()?;
                    (
                        Box::new(CommandScanExtractor::new(&skills)?),
                        UsageAggregate::with_registry(&skills),
                    )
                }
            };

        for session in &sessions {
            if !filter.matches(session.date.as_deref()) {
                debug!(session_id = %session.session_id, "Session outside date filter");
                continue;
            }
            aggregate.begin_session(session);

            let file = File::open(&session.path)
                .with_context(|| format!("Failed to open transcript: {}", session.path.display()))?;
            for line in BufReader::new(file).lines() {
                // Unreadable lines (invalid UTF-8) are data-shape issues,
                // skipped like any other malformed line
                let Ok(line) = line else {
                    debug!(session_id = %session.session_id, "Skipping unreadable line");
                    continue;
                };
                for event in extractor.extract(&line) {
                    aggregate.record(&session.session_id, &event);
                }
            }
        }

        debug!(
            total = aggregate.total(),
            sessions = aggregate.sessions_examined(),
            "Aggregation complete"
        );
        Ok((aggregate, filter))
    }

    /// Aggregate and render, exit code stays zero even for an empty corpus.
    pub fn run(&self, options: &ScanOptions) -> Result<()> {
        let (aggregate, filter) = self.aggregate(options)?;
        self.display.display_report(&aggregate, &filter, options);
        Ok(())
    }
}
