//! Event extraction strategies.
//!
//! Two strategies produce [`ToolEvent`]s from a transcript line:
//!
//! - [`ToolCallExtractor`] reads explicit `toolCall`/`tool_use` content
//!   blocks and reports the block's `name` verbatim (exact mode).
//! - [`CommandScanExtractor`] inspects only `exec` blocks and scans their
//!   shell command text for mentions of installed skills (fuzzy mode).
//!
//! Both share the decode contract: a line that fails to decode into a
//! `type == "message"` record with an array-valued `content` yields no
//! events and no error.

use crate::models::{Record, ToolEvent};
use anyhow::Result;
use regex::Regex;

/// Longest command prefix kept as a match example.
pub const EXAMPLE_MAX_CHARS: usize = 100;

pub trait EventExtractor {
    fn extract(&self, line: &str) -> Vec<ToolEvent>;
}

fn decode_message(line: &str) -> Option<Record> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<Record>(trimmed)
        .ok()
        .filter(Record::is_message)
}

/// Exact mode: one event per structured tool-call block.
pub struct ToolCallExtractor;

impl EventExtractor for ToolCallExtractor {
    fn extract(&self, line: &str) -> Vec<ToolEvent> {
        let Some(record) = decode_message(line) else {
            return Vec::new();
        };

        record
            .message
            .content
            .iter()
            .filter(|block| block.is_tool_call())
            .filter_map(|block| {
                let name = block.name.as_deref()?;
                Some(ToolEvent {
                    tool: name.to_string(),
                    timestamp: record.timestamp.clone(),
                    record_id: record.id.clone(),
                    command: None,
                })
            })
            .collect()
    }
}

/// One installed skill with its precompiled match patterns.
///
/// Three strategies qualify a match, any one suffices:
/// 1. skill name immediately followed by a path separator or whitespace
/// 2. the path fragment `skills/<name>` anywhere in the command
/// 3. the skill name as a whole word anywhere in the command
///
/// All are case-insensitive. Strategy 3 subsumes most of 1 and 2; the
/// three-way structure is kept for compatibility with existing reports.
/// A command that merely mentions a skill in an argument or comment still
/// counts: the heuristic favors recall over precision.
struct SkillMatcher {
    name: String,
    invocation: Regex,
    path_fragment: String,
    whole_word: Regex,
}

impl SkillMatcher {
    fn new(name: &str) -> Result<Self> {
        let escaped = regex::escape(name);
        Ok(Self {
            name: name.to_string(),
            invocation: Regex::new(&format!(r"(?i){}[/\\\s]", escaped))?,
            path_fragment: format!("skills/{}", name.to_lowercase()),
            whole_word: Regex::new(&format!(r"(?i)\b{}\b", escaped))?,
        })
    }

    fn matches(&self, command: &str) -> bool {
        self.invocation.is_match(command)
            || command.to_lowercase().contains(&self.path_fragment)
            || self.whole_word.is_match(command)
    }
}

/// Fuzzy mode: scan `exec` command text against the skill registry.
pub struct CommandScanExtractor {
    skills: Vec<SkillMatcher>,
}

impl CommandScanExtractor {
    pub fn new(skill_names: &[String]) -> Result<Self> {
        let skills = skill_names
            .iter()
            .map(|name| SkillMatcher::new(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { skills })
    }

    fn truncate_example(command: &str) -> String {
        command.chars().take(EXAMPLE_MAX_CHARS).collect()
    }
}

impl EventExtractor for CommandScanExtractor {
    fn extract(&self, line: &str) -> Vec<ToolEvent> {
        let Some(record) = decode_message(line) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for block in &record.message.content {
            if block.name.as_deref() != Some("exec") {
                continue;
            }
            let Some(command) = block.command() else {
                continue;
            };

            // One event per matched skill, however many strategies hit
            for skill in self.skills.iter().filter(|s| s.matches(command)) {
                events.push(ToolEvent {
                    tool: skill.name.clone(),
                    timestamp: record.timestamp.clone(),
                    record_id: record.id.clone(),
                    command: Some(Self::truncate_example(command)),
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_line(blocks: &str) -> String {
        format!(
            r#"{{"type":"message","message":{{"content":[{}]}},"timestamp":"2026-02-02T10:00:00Z","id":"rec-9"}}"#,
            blocks
        )
    }

    fn exec_line(command: &str) -> String {
        message_line(&format!(
            r#"{{"type":"toolCall","name":"exec","arguments":{{"command":"{}"}}}}"#,
            command
        ))
    }

    fn scanner(names: &[&str]) -> CommandScanExtractor {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        CommandScanExtractor::new(&names).unwrap()
    }

    #[test]
    fn test_exact_extracts_tool_call_blocks() {
        let line = message_line(
            r#"{"type":"toolCall","name":"read","arguments":{}},{"type":"text"},{"type":"tool_use","name":"write","arguments":{}}"#,
        );
        let events = ToolCallExtractor.extract(&line);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tool, "read");
        assert_eq!(events[1].tool, "write");
        assert_eq!(events[0].record_id.as_deref(), Some("rec-9"));
    }

    #[test]
    fn test_exact_skips_malformed_and_non_message_lines() {
        assert!(ToolCallExtractor.extract("{oops").is_empty());
        assert!(ToolCallExtractor.extract("").is_empty());
        let wrong_type = r#"{"type":"event","message":{"content":[]},"timestamp":"2026-02-02T10:00:00Z"}"#;
        assert!(ToolCallExtractor.extract(wrong_type).is_empty());
    }

    #[test]
    fn test_exact_ignores_nameless_blocks() {
        let line = message_line(r#"{"type":"toolCall","arguments":{}}"#);
        assert!(ToolCallExtractor.extract(&line).is_empty());
    }

    #[test]
    fn test_fuzzy_matches_path_invocation() {
        let extractor = scanner(&["claw-lint", "claw-git"]);
        let events = extractor.extract(&exec_line("node skills/claw-lint/index.js --fix"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tool, "claw-lint");
    }

    #[test]
    fn test_fuzzy_matches_multiple_skills_once_each() {
        let extractor = scanner(&["claw-lint", "claw-git"]);
        let events = extractor.extract(&exec_line("claw-lint . && claw-git status"));
        let mut tools: Vec<&str> = events.iter().map(|e| e.tool.as_str()).collect();
        tools.sort();
        assert_eq!(tools, vec!["claw-git", "claw-lint"]);
    }

    #[test]
    fn test_fuzzy_is_case_insensitive() {
        let extractor = scanner(&["claw-lint"]);
        let events = extractor.extract(&exec_line("node SKILLS/Claw-Lint/index.js"));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_fuzzy_ignores_non_exec_blocks() {
        let extractor = scanner(&["claw-lint"]);
        let line = message_line(
            r#"{"type":"toolCall","name":"read","arguments":{"command":"claw-lint ."}}"#,
        );
        assert!(extractor.extract(&line).is_empty());
    }

    #[test]
    fn test_fuzzy_whole_word_mention_counts() {
        // Recall over precision: a bare mention is still a match
        let extractor = scanner(&["claw-lint"]);
        let events = extractor.extract(&exec_line("echo done by claw-lint"));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_fuzzy_no_partial_name_match() {
        let extractor = scanner(&["claw"]);
        assert!(extractor.extract(&exec_line("clawhammer --help")).is_empty());
    }

    #[test]
    fn test_example_truncated_to_limit() {
        let extractor = scanner(&["claw-lint"]);
        let long_tail = "x".repeat(300);
        let events = extractor.extract(&exec_line(&format!("claw-lint {}", long_tail)));
        assert_eq!(events[0].command.as_ref().unwrap().chars().count(), EXAMPLE_MAX_CHARS);
    }
}
