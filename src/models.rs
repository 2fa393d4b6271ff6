use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Speaker identity used when a line carries no recognizable speaker label.
pub const UNKNOWN_SPEAKER: &str = "UNK";

/// One speaker-attributed line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Utterance {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// Speaker identity → free-text role label, loaded from the side table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTable {
    roles: HashMap<String, String>,
}

impl RoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role. A later insert for the same identity replaces the earlier one.
    pub fn insert(&mut self, identity: impl Into<String>, role: impl Into<String>) {
        self.roles.insert(identity.into(), role.into());
    }

    pub fn get(&self, identity: &str) -> Option<&str> {
        self.roles.get(identity).map(|r| r.as_str())
    }

    /// Role for an identity, or the empty string when unknown.
    pub fn role_of(&self, identity: &str) -> &str {
        self.get(identity).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RoleTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = RoleTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// A loaded transcript: name, ordered utterances, and its role table.
#[derive(Debug, Clone)]
pub struct Meeting {
    pub name: String,
    pub utterances: Vec<Utterance>,
    pub roles: RoleTable,
}

/// Extractor output for a single actionable utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAction {
    pub task: String,
    pub deadline_raw: Option<String>,
    pub assignee_name: Option<String>,
}

/// Final output unit, one per actionable utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub meeting: String,
    pub speaker: String,
    pub speaker_role: String,
    pub assignee: String,
    pub assignee_role: String,
    pub action_item: String,
    pub deadline_text: Option<String>,
    pub deadline_iso: Option<String>,
}

/// Reduced output shape: no roles, no assignee, raw deadline only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedRecord {
    pub meeting: String,
    pub speaker: String,
    pub action_item: String,
    pub deadline: Option<String>,
}

impl From<&ActionRecord> for ReducedRecord {
    fn from(r: &ActionRecord) -> Self {
        ReducedRecord {
            meeting: r.meeting.clone(),
            speaker: r.speaker.clone(),
            action_item: r.action_item.clone(),
            deadline: r.deadline_text.clone(),
        }
    }
}

/// Loose view of any output record (full, reduced, or hand-written gold),
/// used when reading files back for display and evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LooseRecord {
    #[serde(default)]
    pub meeting: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub assignee_role: Option<String>,
    #[serde(default)]
    pub action_item: Option<String>,
    #[serde(default, alias = "deadline")]
    pub deadline_text: Option<String>,
    #[serde(default)]
    pub deadline_iso: Option<String>,
}

impl From<&ActionRecord> for LooseRecord {
    fn from(r: &ActionRecord) -> Self {
        LooseRecord {
            meeting: Some(r.meeting.clone()),
            speaker: Some(r.speaker.clone()),
            assignee: Some(r.assignee.clone()),
            assignee_role: Some(r.assignee_role.clone()),
            action_item: Some(r.action_item.clone()),
            deadline_text: r.deadline_text.clone(),
            deadline_iso: r.deadline_iso.clone(),
        }
    }
}
