//! Core Data Models
//!
//! This module defines the data structures used throughout the tool usage
//! report pipeline, from raw transcript records to the serialized report.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`Record`] / [`ContentBlock`] - one JSON record per
//!    transcript line, decoded with serde
//! 2. **Extraction**: [`ToolEvent`] - the fact "tool T was invoked within
//!    session S at time TS"
//! 3. **Output**: [`UsageReport`] - the machine-readable report document,
//!    with [`ReportSummary`], [`ToolUsageOutput`] and [`SessionDetailOutput`]
//!
//! ## Decode Behavior
//!
//! Transcript lines that fail to decode into [`Record`] are skipped, never
//! fatal. The decode step is the single shape check: a record must have
//! `type == "message"`, an array-valued `content`, and a timestamp to be
//! inspected at all. Everything else (unknown block types, missing names,
//! odd argument shapes) simply produces no events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub record_type: String,
    pub message: MessageData,
    pub timestamp: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageData {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

impl Record {
    /// True for the only record shape the extractors inspect.
    pub fn is_message(&self) -> bool {
        self.record_type == "message"
    }
}

impl ContentBlock {
    /// True for structured tool-call blocks (both spellings seen in the wild).
    pub fn is_tool_call(&self) -> bool {
        matches!(self.block_type.as_str(), "toolCall" | "tool_use")
    }

    /// The shell command string of an `exec` block, if present.
    pub fn command(&self) -> Option<&str> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get("command"))
            .and_then(|cmd| cmd.as_str())
    }
}

/// One extracted tool invocation. `command` carries the truncated shell
/// command that produced the match in fuzzy mode, `None` in exact mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolEvent {
    pub tool: String,
    pub timestamp: String,
    pub record_id: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "totalInvocations")]
    pub total_invocations: u64,
    #[serde(rename = "sessionsExamined")]
    pub sessions_examined: u64,
    #[serde(rename = "distinctTools")]
    pub distinct_tools: u64,
    #[serde(rename = "dateFilter")]
    pub date_filter: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolUsageOutput {
    pub name: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u64>,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailOutput {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub date: Option<String>,
    #[serde(rename = "toolCalls")]
    pub tool_calls: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub summary: ReportSummary,
    pub tools: Vec<ToolUsageOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unused: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<SessionDetailOutput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decodes_tool_call_block() {
        let line = r#"{"type":"message","message":{"content":[{"type":"toolCall","name":"read","arguments":{"path":"/tmp/x"}}]},"timestamp":"2026-02-02T10:00:00Z","id":"rec-1"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert!(record.is_message());
        assert_eq!(record.message.content.len(), 1);
        assert!(record.message.content[0].is_tool_call());
        assert_eq!(record.message.content[0].name.as_deref(), Some("read"));
    }

    #[test]
    fn test_string_content_fails_decode() {
        // Plain-text messages carry a string body, not a block array.
        let line = r#"{"type":"message","message":{"content":"hello"},"timestamp":"2026-02-02T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn test_exec_block_command() {
        let line = r#"{"type":"message","message":{"content":[{"type":"toolCall","name":"exec","arguments":{"command":"ls -la"}}]},"timestamp":"2026-02-02T10:00:00Z"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.message.content[0].command(), Some("ls -la"));
    }
}
