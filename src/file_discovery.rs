use crate::config::get_config;
use crate::models::Record;
use crate::timestamp_parser::TimestampParser;
use anyhow::{Context, Result};
use glob::glob;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One discovered transcript: a session identity plus its derived date.
///
/// The session id is the file stem. The date comes from the timestamp of the
/// first non-empty line; if that line does not decode, the session is
/// dateless and any active date filter excludes it.
#[derive(Debug, Clone)]
pub struct SessionFile {
    pub path: PathBuf,
    pub session_id: String,
    pub date: Option<String>,
}

/// Handles file system traversal and discovery of transcripts and skills
pub struct FileDiscovery {
    sessions_dir: PathBuf,
    skills_dir: PathBuf,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDiscovery {
    pub fn new() -> Self {
        let config = get_config();
        Self {
            sessions_dir: config.paths.sessions_directory.clone(),
            skills_dir: config.paths.skills_directory.clone(),
        }
    }

    /// Construct against explicit directories, bypassing global config
    pub fn with_paths(sessions_dir: PathBuf, skills_dir: PathBuf) -> Self {
        Self {
            sessions_dir,
            skills_dir,
        }
    }

    /// Find all transcript files in the sessions directory.
    ///
    /// A missing sessions directory is fatal: there is no corpus to report
    /// on, and an empty report would hide the misconfiguration.
    pub fn find_session_files(&self) -> Result<Vec<SessionFile>> {
        if !self.sessions_dir.exists() {
            anyhow::bail!(
                "Sessions directory does not exist: {}",
                self.sessions_dir.display()
            );
        }

        let pattern = self.sessions_dir.join("*.jsonl");
        let mut files = Vec::new();

        if let Ok(paths) = glob(&pattern.to_string_lossy()) {
            for entry in paths.flatten() {
                let session_id = entry
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_else(|| entry.to_string_lossy().to_string());
                let date = self.session_date(&entry);
                files.push(SessionFile {
                    path: entry,
                    session_id,
                    date,
                });
            }
        }

        // Stable order keeps repeated runs byte-identical
        files.sort_by(|a, b| a.session_id.cmp(&b.session_id));

        debug!(count = files.len(), "Discovered session files");
        Ok(files)
    }

    /// Enumerate installed skill identifiers (subdirectory names).
    ///
    /// A missing skills directory degrades to an empty registry: the report
    /// then shows nothing matched and nothing installed.
    pub fn find_installed_skills(&self) -> Result<Vec<String>> {
        if !self.skills_dir.exists() {
            warn!(
                skills_dir = %self.skills_dir.display(),
                "Skills directory does not exist, reporting empty registry"
            );
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.skills_dir).with_context(|| {
            format!("Failed to read skills directory: {}", self.skills_dir.display())
        })?;

        let mut skills: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();

        skills.sort();
        Ok(skills)
    }

    /// Derive the session date from the first non-empty line of a transcript
    fn session_date(&self, file_path: &Path) -> Option<String> {
        let file = File::open(file_path).ok()?;
        let reader = BufReader::new(file);

        let first_line = reader
            .lines()
            .map_while(|line| line.ok())
            .find(|line| !line.trim().is_empty())?;

        let record: Record = serde_json::from_str(first_line.trim()).ok()?;
        TimestampParser::date_of(&record.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_transcript(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_missing_sessions_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let discovery = FileDiscovery::with_paths(
            temp.path().join("nope"),
            temp.path().join("skills"),
        );
        assert!(discovery.find_session_files().is_err());
    }

    #[test]
    fn test_missing_skills_dir_degrades_to_empty() {
        let temp = TempDir::new().unwrap();
        let discovery = FileDiscovery::with_paths(
            temp.path().to_path_buf(),
            temp.path().join("nope"),
        );
        assert_eq!(discovery.find_installed_skills().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_session_id_and_date_derivation() {
        let temp = TempDir::new().unwrap();
        write_transcript(
            temp.path(),
            "session-abc.jsonl",
            &[r#"{"type":"message","message":{"content":[]},"timestamp":"2026-02-02T08:30:00Z"}"#],
        );
        write_transcript(temp.path(), "session-bad.jsonl", &["{not json"]);

        let discovery =
            FileDiscovery::with_paths(temp.path().to_path_buf(), temp.path().join("skills"));
        let files = discovery.find_session_files().unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].session_id, "session-abc");
        assert_eq!(files[0].date.as_deref(), Some("2026-02-02"));
        // Malformed first line leaves the session dateless
        assert_eq!(files[1].session_id, "session-bad");
        assert_eq!(files[1].date, None);
    }

    #[test]
    fn test_skill_enumeration_is_sorted() {
        let temp = TempDir::new().unwrap();
        let skills = temp.path().join("skills");
        for name in ["claw-lint", "claw-git", "claw-fmt"] {
            std::fs::create_dir_all(skills.join(name)).unwrap();
        }
        // Loose files in the registry are not skills
        File::create(skills.join("README.md")).unwrap();

        let discovery = FileDiscovery::with_paths(temp.path().to_path_buf(), skills);
        assert_eq!(
            discovery.find_installed_skills().unwrap(),
            vec!["claw-fmt", "claw-git", "claw-lint"]
        );
    }
}
