//! Assignee resolution: explicit names, then first/second-person pronouns,
//! then the speaker.

use serde::Serialize;

use crate::models::{ParsedAction, RoleTable, Utterance};

/// Identities referenced by "I" and "you" in one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pronouns {
    pub i: Option<String>,
    pub you: Option<String>,
}

/// Resolve "I" to the speaker and "you" to the last-addressed identity.
///
/// A pronoun counts only as a standalone space-delimited token or as the
/// leading token. "you" stays unresolved when nobody has been addressed.
pub fn resolve_pronouns(text: &str, speaker: &str, last_addressed: Option<&str>) -> Pronouns {
    let padded = format!(" {} ", text.to_lowercase());
    let mentions = |word: &str| {
        padded.contains(&format!(" {word} ")) || padded.trim().starts_with(&format!("{word} "))
    };

    Pronouns {
        i: mentions("i").then(|| speaker.to_string()),
        you: if mentions("you") {
            last_addressed.map(str::to_string)
        } else {
            None
        },
    }
}

/// Pick `(assignee, role)` for an actionable utterance.
///
/// An extracted name always wins, known to the role table or not. Otherwise
/// "I" assigns the speaker, and "you" assigns the last-addressed identity
/// when the role table knows it. The speaker is the default.
pub fn choose_assignee(
    utt: &Utterance,
    roles: &RoleTable,
    parsed: &ParsedAction,
    last_addressed: Option<&str>,
) -> (String, String) {
    if let Some(name) = parsed.assignee_name.as_deref() {
        return (name.to_string(), roles.role_of(name).to_string());
    }

    let speaker_default = || (utt.speaker.clone(), roles.role_of(&utt.speaker).to_string());

    let pron = resolve_pronouns(&utt.text, &utt.speaker, last_addressed);
    if pron.i.is_some() {
        return speaker_default();
    }
    if let Some(you) = pron.you {
        if let Some(role) = roles.get(&you) {
            let role = role.to_string();
            return (you, role);
        }
    }

    speaker_default()
}

/// Next value of the last-addressed identity after `text` has been processed.
///
/// A title-cased alphabetic first token (trailing punctuation ignored)
/// becomes the new value; otherwise the current value carries over.
pub fn next_last_addressed(text: &str, current: Option<String>) -> Option<String> {
    let Some(first) = text.split_whitespace().next() else {
        return current;
    };
    let token = first.trim_end_matches(|c: char| matches!(c, ',' | '.' | ':' | ';' | '!' | '?'));
    if is_title_word(token) {
        Some(token.to_string())
    } else {
        current
    }
}

fn is_title_word(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(head) = chars.next() else {
        return false;
    };
    head.is_alphabetic()
        && head.is_uppercase()
        && chars.all(|c| c.is_alphabetic() && c.is_lowercase())
}
