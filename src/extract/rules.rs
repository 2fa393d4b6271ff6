//! Trigger-phrase, deadline, and assignee-name matching.
//!
//! All matching is surface-level: fixed phrases and a handful of regexes.

use regex::Regex;
use std::sync::OnceLock;

/// Phrases that usually open an action or request. Matched against the
/// ASCII-lowercased utterance.
pub const TRIGGERS: &[&str] = &[
    "we need to",
    "we should",
    "can you",
    "could you",
    "please",
    "let's all",
    "let's",
    "let us",
    "i think we should",
    "i will",
    "you need to",
    "you should",
    "can we",
    "shall we",
];

/// Byte offset of the earliest trigger phrase in `text`, if any.
pub fn find_trigger(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets aligned with the original
    let lower = text.to_ascii_lowercase();
    TRIGGERS.iter().filter_map(|t| lower.find(t)).min()
}

fn deadline_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            // by Friday, by next week, by end of day
            r"(?i)\bby ([^,.!?]+)",
            // in the next two days
            r"(?i)\bin the next ([^,.!?]+)",
            // within 2 days, within a week
            r"(?i)\bwithin ([^,.!?]+)",
            // next Tuesday, tomorrow, today, tonight
            r"(?i)\b(next [^,.!?]+|tomorrow|today|tonight)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid deadline regex"))
        .collect()
    })
}

/// Raw deadline phrase: the full span of the first pattern (in priority
/// order) that matches anywhere in `text`.
pub fn extract_deadline(text: &str) -> Option<String> {
    deadline_patterns()
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn assignee_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            // Jason, can you ...
            r"\b([A-Z][a-z]+)\b,\s*can you",
            // Sue can you ...
            r"\b([A-Z][a-z]+)\b\s+can you",
            // can you, Jason, ...
            r"can you,?\s+([A-Z][a-z]+)\b",
            // Jason, please ...
            r"\b([A-Z][a-z]+)\b,\s*please",
            // Jason, ... at the very start
            r"^([A-Z][a-z]+),",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid assignee regex"))
        .collect()
    })
}

/// Capitalized name addressed by the utterance, e.g. "Jason, can you ...".
pub fn extract_assignee_name(text: &str) -> Option<String> {
    let text = text.trim();
    assignee_patterns()
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Triggers
    // =====================================================================

    #[test]
    fn test_earliest_trigger_wins() {
        let text = "Okay so please, can you send it";
        assert_eq!(find_trigger(text), Some(8));
    }

    #[test]
    fn test_trigger_is_case_insensitive() {
        assert_eq!(find_trigger("WE NEED TO ship"), Some(0));
    }

    #[test]
    fn test_no_trigger() {
        assert_eq!(find_trigger("The weather is nice today."), None);
    }

    // =====================================================================
    // Deadlines
    // =====================================================================

    #[test]
    fn test_by_phrase() {
        assert_eq!(
            extract_deadline("We need to send the report by Friday.").as_deref(),
            Some("by Friday")
        );
    }

    #[test]
    fn test_in_the_next_phrase() {
        assert_eq!(
            extract_deadline("Finish it in the next two days, okay?").as_deref(),
            Some("in the next two days")
        );
    }

    #[test]
    fn test_within_phrase() {
        assert_eq!(
            extract_deadline("reply within a week").as_deref(),
            Some("within a week")
        );
    }

    #[test]
    fn test_bare_relative_words() {
        assert_eq!(extract_deadline("can you do it tomorrow").as_deref(), Some("tomorrow"));
        assert_eq!(
            extract_deadline("let's meet next Tuesday.").as_deref(),
            Some("next Tuesday")
        );
    }

    #[test]
    fn test_by_outranks_bare_words_regardless_of_position() {
        assert_eq!(
            extract_deadline("Tomorrow we ship it by noon").as_deref(),
            Some("by noon")
        );
    }

    #[test]
    fn test_by_needs_word_boundary() {
        assert_eq!(extract_deadline("goodbye everyone"), None);
    }

    // =====================================================================
    // Assignee names
    // =====================================================================

    #[test]
    fn test_name_comma_can_you() {
        assert_eq!(
            extract_assignee_name("Jason, can you book the room?").as_deref(),
            Some("Jason")
        );
    }

    #[test]
    fn test_name_can_you() {
        assert_eq!(
            extract_assignee_name("Sue can you take notes").as_deref(),
            Some("Sue")
        );
    }

    #[test]
    fn test_can_you_name() {
        assert_eq!(
            extract_assignee_name("can you, Jason, book it").as_deref(),
            Some("Jason")
        );
    }

    #[test]
    fn test_name_please() {
        assert_eq!(
            extract_assignee_name("Maria, please update the slides").as_deref(),
            Some("Maria")
        );
    }

    #[test]
    fn test_leading_name_comma() {
        assert_eq!(
            extract_assignee_name("Tom, we need to talk").as_deref(),
            Some("Tom")
        );
    }

    #[test]
    fn test_all_caps_is_not_a_name() {
        assert_eq!(extract_assignee_name("PM, can you check"), None);
    }

    #[test]
    fn test_no_name() {
        assert_eq!(extract_assignee_name("we need to fix the build"), None);
    }
}
