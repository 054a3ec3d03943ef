//! Output Formatting and Display Management
//!
//! Renders an aggregated run either as one machine-readable JSON document or
//! as a colored terminal report with derived recommendations.
//!
//! ## Machine Output
//!
//! A single pretty-printed JSON document:
//!
//! ```json
//! {
//!   "summary": {
//!     "totalInvocations": 42,
//!     "sessionsExamined": 6,
//!     "distinctTools": 4,
//!     "dateFilter": ["2026-08-30"]
//!   },
//!   "tools": [
//!     {"name": "read", "count": 30, "sessions": 5, "percent": 71.4}
//!   ],
//!   "unused": ["claw-fmt"]
//! }
//! ```
//!
//! `tools` is sorted by descending count with first-seen order breaking
//! ties; `unused` (fuzzy mode only) is sorted lexicographically; `sessions`
//! appears under exact mode with `--sessions`. Identical corpus and filter
//! produce byte-identical output.
//!
//! ## Human Output
//!
//! An aligned table plus recommendation lists. The thresholds are fixed
//! design constants: low usage is ≤ 2 calls; heavy usage is a share above
//! 15% of the total (exact mode) or ≥ 10 calls (fuzzy tiers).

use crate::aggregator::UsageAggregate;
use crate::analyzer::{ScanMode, ScanOptions};
use crate::date_filter::DateFilter;
use crate::models::{ReportSummary, ToolUsageOutput, UsageReport};
use colored::Colorize;

/// Tools at or below this count are flagged as low usage.
pub const LOW_USAGE_MAX: u64 = 2;
/// Exact mode: shares above this percentage are flagged as heavy usage.
pub const HEAVY_SHARE_PCT: f64 = 15.0;
/// Fuzzy mode: counts at or above this are the heavy tier.
pub const HEAVY_COUNT_MIN: u64 = 10;

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

fn round_percent(percent: f64) -> f64 {
    (percent * 10.0).round() / 10.0
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    pub fn display_report(
        &self,
        aggregate: &UsageAggregate,
        filter: &DateFilter,
        options: &ScanOptions,
    ) {
        if options.json_output {
            let report = self.build_report(aggregate, filter, options);
            match serde_json::to_string_pretty(&report) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing report to JSON: {}", e),
            }
            return;
        }

        match options.mode {
            ScanMode::ToolCalls => self.display_tool_calls(aggregate, filter, options),
            ScanMode::SkillCommands => self.display_skill_commands(aggregate, filter, options),
        }
    }

    /// Build the machine-readable document; also the determinism seam the
    /// integration tests assert on.
    pub fn build_report(
        &self,
        aggregate: &UsageAggregate,
        filter: &DateFilter,
        options: &ScanOptions,
    ) -> UsageReport {
        let exact = options.mode == ScanMode::ToolCalls;

        let tools = aggregate
            .used_tools()
            .into_iter()
            .map(|(name, count)| ToolUsageOutput {
                name: name.to_string(),
                count,
                sessions: exact.then(|| aggregate.sessions_for(name)),
                percent: round_percent(aggregate.percent(count)),
                examples: (!exact && options.verbose)
                    .then(|| aggregate.examples_for(name).to_vec()),
            })
            .collect();

        UsageReport {
            summary: ReportSummary {
                total_invocations: aggregate.total(),
                sessions_examined: aggregate.sessions_examined(),
                distinct_tools: aggregate.distinct_used(),
                date_filter: filter.dates(),
            },
            tools,
            unused: (!exact).then(|| aggregate.unused_tools()),
            sessions: (exact && options.include_sessions)
                .then(|| aggregate.session_details()),
        }
    }

    fn print_header(&self, title: &str, filter: &DateFilter, aggregate: &UsageAggregate) {
        println!("\n{}", "=".repeat(80).bright_cyan());
        println!("{}", title.bright_white().bold());
        println!("{}", "=".repeat(80).bright_cyan());

        let scope = match filter.dates() {
            Some(dates) => dates.join(", "),
            None => "all dates".to_string(),
        };
        println!(
            "\n{} {} invocations • {} sessions • {}\n",
            "📊".bright_yellow(),
            aggregate.total().to_string().bright_white().bold(),
            aggregate.sessions_examined().to_string().bright_white().bold(),
            scope.bright_blue()
        );
    }

    fn display_tool_calls(
        &self,
        aggregate: &UsageAggregate,
        filter: &DateFilter,
        options: &ScanOptions,
    ) {
        self.print_header("Tool Usage Report - Tool Calls", filter, aggregate);

        let used = aggregate.used_tools();
        if used.is_empty() {
            println!("No tool invocations found.");
            return;
        }

        let name_width = used.iter().map(|(name, _)| name.len()).max().unwrap_or(4);
        for (name, count) in &used {
            println!(
                "   {:<width$}  {:>6} calls  {:>4} sessions  {:>5}%",
                name.bright_cyan(),
                count.to_string().bright_white().bold(),
                aggregate.sessions_for(name).to_string().bright_white(),
                format!("{:.1}", aggregate.percent(*count)).bright_yellow(),
                width = name_width
            );
        }

        let low: Vec<&str> = used
            .iter()
            .filter(|(_, count)| *count <= LOW_USAGE_MAX)
            .map(|(name, _)| *name)
            .collect();
        let heavy: Vec<&str> = used
            .iter()
            .filter(|(_, count)| aggregate.percent(*count) > HEAVY_SHARE_PCT)
            .map(|(name, _)| *name)
            .collect();

        println!();
        if !heavy.is_empty() {
            println!(
                "{} Heavy usage (>{:.0}% of calls): {}",
                "🔥".bright_red(),
                HEAVY_SHARE_PCT,
                heavy.join(", ").bright_white().bold()
            );
        }
        if !low.is_empty() {
            println!(
                "{} Low usage (≤{} calls), pruning candidates: {}",
                "🧹".bright_yellow(),
                LOW_USAGE_MAX,
                low.join(", ").bright_white()
            );
        }

        if options.verbose {
            println!("\n{} Per-session breakdown:", "📂".bright_blue());
            for detail in aggregate.session_details() {
                let calls: u64 = detail.tool_calls.values().sum();
                println!(
                    "   {} ({}): {} calls",
                    detail.session_id.bright_cyan(),
                    detail.date.as_deref().unwrap_or("no date"),
                    calls.to_string().bright_white()
                );
            }
        }
    }

    fn display_skill_commands(
        &self,
        aggregate: &UsageAggregate,
        filter: &DateFilter,
        options: &ScanOptions,
    ) {
        self.print_header("Tool Usage Report - Installed Skills", filter, aggregate);

        let used = aggregate.used_tools();
        let unused = aggregate.unused_tools();

        if used.is_empty() && unused.is_empty() {
            println!("No skills installed, nothing to match.");
            return;
        }

        let name_width = used
            .iter()
            .map(|(name, _)| name.len())
            .chain(unused.iter().map(String::len))
            .max()
            .unwrap_or(4);

        for (name, count) in &used {
            let tier = if *count >= HEAVY_COUNT_MIN {
                "heavy".bright_red()
            } else if *count <= LOW_USAGE_MAX {
                "low".bright_yellow()
            } else {
                "normal".bright_green()
            };
            println!(
                "   {:<width$}  {:>6} matches  {:>5}%  {}",
                name.bright_cyan(),
                count.to_string().bright_white().bold(),
                format!("{:.1}", aggregate.percent(*count)).bright_yellow(),
                tier,
                width = name_width
            );
            if options.verbose {
                for example in aggregate.examples_for(name) {
                    println!("      {} {}", "└".bright_black(), example.bright_black());
                }
            }
        }

        if !unused.is_empty() {
            println!(
                "\n{} Unused skills ({}): {}",
                "🧹".bright_yellow(),
                unused.len().to_string().bright_white().bold(),
                unused.join(", ").bright_white()
            );
        }
    }
}
