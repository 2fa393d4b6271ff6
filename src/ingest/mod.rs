pub mod json;
pub mod roles;
pub mod text;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{Meeting, RoleTable, Utterance};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Text,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "text" | "txt" => Some(Format::Text),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

/// List transcript files in `dir`, sorted by file name.
///
/// Non-recursive. Skips the role table and any path in `exclude` (typically
/// a previous output file written into the same directory). A missing
/// directory yields an empty list.
pub fn iter_meeting_files(dir: &Path, roles_filename: &str, exclude: &[&Path]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("Input directory not found: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| Format::detect_from_extension(p).is_some())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.eq_ignore_ascii_case(roles_filename))
                .unwrap_or(true)
        })
        .filter(|p| !exclude.iter().any(|x| same_file(p, x)))
        .collect();
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(entries)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Load one meeting: transcript utterances plus the role table at `roles_path`.
pub fn load_meeting(path: &Path, roles_path: &Path) -> Result<Meeting> {
    let format = Format::detect_from_extension(path)
        .with_context(|| format!("Cannot determine format for: {}", path.display()))?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    let utterances = parse_content(&content, format)
        .with_context(|| format!("Failed to parse: {}", path.display()))?;
    let roles = roles::load_roles(roles_path)?;

    let meeting = Meeting {
        name: meeting_name(path),
        utterances,
        roles,
    };
    info!(
        "Loaded meeting {} ({} utterances, {} roles)",
        meeting.name,
        meeting.utterances.len(),
        meeting.roles.len()
    );
    Ok(meeting)
}

/// Build a meeting from in-memory transcript text.
pub fn meeting_from_text(name: &str, content: &str, roles: RoleTable) -> Meeting {
    Meeting {
        name: name.to_string(),
        utterances: text::parse_text(content),
        roles,
    }
}

/// Meeting name: the transcript's file name without extension.
pub fn meeting_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

fn parse_content(content: &str, format: Format) -> Result<Vec<Utterance>> {
    match format {
        Format::Json => json::parse_json(content),
        Format::Text => Ok(text::parse_text(content)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::detect_from_extension(Path::new("a.txt")), Some(Format::Text));
        assert_eq!(Format::detect_from_extension(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::detect_from_extension(Path::new("roles.csv")), None);
        assert_eq!(Format::from_str("TXT"), Some(Format::Text));
    }

    #[test]
    fn test_meeting_name_strips_extension() {
        assert_eq!(meeting_name(Path::new("/data/ES2002a.txt")), "ES2002a");
    }

    #[test]
    fn test_iter_meeting_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.json", "roles.csv", "notes.md", "actions.json"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let out = dir.path().join("actions.json");
        let files = iter_meeting_files(dir.path(), "roles.csv", &[out.as_path()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| meeting_name(p)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = iter_meeting_files(&dir.path().join("nope"), "roles.csv", &[]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_load_meeting_with_roles() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("standup.txt");
        std::fs::write(&transcript, "Sam: Lee, can you review the draft?\n\nLee: sure\n").unwrap();
        let roles = dir.path().join("roles.csv");
        std::fs::write(&roles, "speaker,role\nSam,manager\n").unwrap();

        let meeting = load_meeting(&transcript, &roles).unwrap();
        assert_eq!(meeting.name, "standup");
        assert_eq!(meeting.utterances.len(), 2);
        assert_eq!(meeting.roles.get("Sam"), Some("manager"));
    }
}
