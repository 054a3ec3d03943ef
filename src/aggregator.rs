//! Event aggregation.
//!
//! [`UsageAggregate`] is an explicit accumulator folded over the event
//! stream. Accumulation is commutative: per-tool counts, distinct-session
//! sets and the running total do not depend on the order files or lines are
//! visited. Only the stored command examples are order-sensitive, and those
//! are advisory.

use crate::file_discovery::SessionFile;
use crate::models::{SessionDetailOutput, ToolEvent};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Most command examples retained per tool.
pub const MAX_EXAMPLES_PER_TOOL: usize = 3;

#[derive(Debug, Default)]
pub struct UsageAggregate {
    counts: HashMap<String, u64>,
    /// First-seen order of tool names, used as the sort tie-breaker.
    discovery_order: Vec<String>,
    sessions_by_tool: HashMap<String, HashSet<String>>,
    examples: HashMap<String, Vec<String>>,
    session_details: HashMap<String, BTreeMap<String, u64>>,
    session_dates: HashMap<String, Option<String>>,
    total: u64,
    sessions_examined: u64,
}

impl UsageAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate with every registry identifier pre-seeded at zero, so idle
    /// tools are reported as unused rather than silently absent.
    pub fn with_registry(registry: &[String]) -> Self {
        let mut aggregate = Self::new();
        for name in registry {
            aggregate.counts.entry(name.clone()).or_insert(0);
            aggregate.discovery_order.push(name.clone());
        }
        aggregate
    }

    /// Admit a session into the run before folding its events.
    pub fn begin_session(&mut self, session: &SessionFile) {
        self.sessions_examined += 1;
        self.session_dates
            .insert(session.session_id.clone(), session.date.clone());
        self.session_details
            .entry(session.session_id.clone())
            .or_default();
    }

    /// Fold one event into the accumulator.
    pub fn record(&mut self, session_id: &str, event: &ToolEvent) {
        if !self.counts.contains_key(&event.tool) {
            self.discovery_order.push(event.tool.clone());
        }
        *self.counts.entry(event.tool.clone()).or_insert(0) += 1;
        self.total += 1;

        self.sessions_by_tool
            .entry(event.tool.clone())
            .or_default()
            .insert(session_id.to_string());

        if let Some(command) = &event.command {
            let examples = self.examples.entry(event.tool.clone()).or_default();
            if examples.len() < MAX_EXAMPLES_PER_TOOL {
                examples.push(command.clone());
            }
        }

        if let Some(detail) = self.session_details.get_mut(session_id) {
            *detail.entry(event.tool.clone()).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn sessions_examined(&self) -> u64 {
        self.sessions_examined
    }

    /// Count of tools that produced at least one event.
    pub fn distinct_used(&self) -> u64 {
        self.counts.values().filter(|count| **count > 0).count() as u64
    }

    /// Tools with at least one event, sorted by descending count; ties keep
    /// first-seen order (stable sort over the discovery list).
    pub fn used_tools(&self) -> Vec<(&str, u64)> {
        let mut used: Vec<(&str, u64)> = self
            .discovery_order
            .iter()
            .map(|name| (name.as_str(), self.counts[name]))
            .filter(|(_, count)| *count > 0)
            .collect();
        used.sort_by(|a, b| b.1.cmp(&a.1));
        used
    }

    /// Registry identifiers with zero events, sorted lexicographically.
    pub fn unused_tools(&self) -> Vec<String> {
        let mut unused: Vec<String> = self
            .counts
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| name.clone())
            .collect();
        unused.sort();
        unused
    }

    /// Share of the total, zero when the total is zero.
    pub fn percent(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// Distinct sessions that invoked the tool at least once.
    pub fn sessions_for(&self, tool: &str) -> u64 {
        self.sessions_by_tool
            .get(tool)
            .map(|sessions| sessions.len() as u64)
            .unwrap_or(0)
    }

    /// Stored command examples for the tool, at most [`MAX_EXAMPLES_PER_TOOL`].
    pub fn examples_for(&self, tool: &str) -> &[String] {
        self.examples
            .get(tool)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Per-session breakdown sorted by session id.
    pub fn session_details(&self) -> Vec<SessionDetailOutput> {
        let mut details: Vec<SessionDetailOutput> = self
            .session_details
            .iter()
            .map(|(session_id, tool_calls)| SessionDetailOutput {
                session_id: session_id.clone(),
                date: self.session_dates.get(session_id).cloned().flatten(),
                tool_calls: tool_calls.clone(),
            })
            .collect();
        details.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        details
    }
}
