//! Rule-based action extraction.
//!
//! One [`Extractor`] serves both inference paths; its [`Strictness`]
//! decides whether the extra cleaning and filtering in [`strict`] apply.

pub mod rules;
pub mod strict;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ParsedAction;

/// Word-count floor for the lenient policy.
pub const LENIENT_MIN_WORDS: usize = 3;
/// Word-count floor for the strict policy.
pub const STRICT_MIN_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

impl Strictness {
    pub fn as_str(&self) -> &str {
        match self {
            Strictness::Lenient => "lenient",
            Strictness::Strict => "strict",
        }
    }

    pub fn default_min_words(&self) -> usize {
        match self {
            Strictness::Lenient => LENIENT_MIN_WORDS,
            Strictness::Strict => STRICT_MIN_WORDS,
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Strictness::Lenient),
            "strict" => Ok(Strictness::Strict),
            other => Err(format!("Unknown strictness: {other}. Use: lenient, strict")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    strictness: Strictness,
    min_words: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Strictness::Lenient)
    }
}

impl Extractor {
    pub fn new(strictness: Strictness) -> Self {
        Extractor {
            strictness,
            min_words: strictness.default_min_words(),
        }
    }

    /// Override the policy's minimum task word count.
    pub fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    /// Extract an action from one utterance, or `None` if it is not actionable.
    pub fn extract(&self, text: &str) -> Option<ParsedAction> {
        match self.strictness {
            Strictness::Lenient => extract_with_min_words(text, self.min_words),
            Strictness::Strict => {
                let parsed = extract_with_min_words(text, LENIENT_MIN_WORDS.min(self.min_words))?;
                self.refine(parsed, text)
            }
        }
    }

    /// Treat the whole utterance as the task, with no deadline or name. Used
    /// when an alternate gate accepts an utterance the trigger rules reject;
    /// the policy's filters still apply.
    pub fn whole_utterance(&self, text: &str) -> Option<ParsedAction> {
        let parsed = ParsedAction {
            task: text.trim().to_string(),
            deadline_raw: None,
            assignee_name: None,
        };
        self.refine(parsed, text)
    }

    /// Apply the policy's cleaning and acceptance rules to a candidate.
    fn refine(&self, parsed: ParsedAction, original: &str) -> Option<ParsedAction> {
        match self.strictness {
            Strictness::Lenient => {
                (word_count(&parsed.task) >= self.min_words.max(1)).then_some(parsed)
            }
            Strictness::Strict => {
                let task = strict::clean_task_phrase(&parsed.task)?;
                if !strict::is_strict_action(&task, original, self.min_words) {
                    return None;
                }
                Some(ParsedAction { task, ..parsed })
            }
        }
    }
}

/// Lenient extraction with the default three-word floor.
pub fn extract_task_and_deadline(text: &str) -> Option<ParsedAction> {
    extract_with_min_words(text, LENIENT_MIN_WORDS)
}

fn extract_with_min_words(text: &str, min_words: usize) -> Option<ParsedAction> {
    let original = text.trim();
    if original.is_empty() {
        return None;
    }

    let start = rules::find_trigger(original)?;
    let task = truncate_at_terminator(original[start..].trim());

    if word_count(task) < min_words.max(1) {
        return None;
    }

    Some(ParsedAction {
        task: task.to_string(),
        deadline_raw: rules::extract_deadline(original),
        assignee_name: rules::extract_assignee_name(original),
    })
}

/// Cut after the first `.`, `?` or `!` when more text follows it.
fn truncate_at_terminator(task: &str) -> &str {
    match task.find(|c: char| matches!(c, '.' | '?' | '!')) {
        Some(idx) if idx + 1 < task.len() => task[..idx + 1].trim(),
        _ => task,
    }
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Lenient extraction
    // =====================================================================

    #[test]
    fn test_send_report_by_friday() {
        let p = extract_task_and_deadline("We need to send the report by Friday.").unwrap();
        assert!(p.task.starts_with("We need to"));
        assert!(p.task.ends_with('.'));
        assert_eq!(p.deadline_raw.as_deref(), Some("by Friday"));
        assert_eq!(p.assignee_name, None);
    }

    #[test]
    fn test_short_greeting_is_not_actionable() {
        assert_eq!(extract_task_and_deadline("Hi"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_task_and_deadline("   "), None);
    }

    #[test]
    fn test_task_starts_at_trigger_and_stops_at_first_terminator() {
        let p = extract_task_and_deadline(
            "So anyway, Jason, can you book the room? We also had lunch.",
        )
        .unwrap();
        assert_eq!(p.task, "can you book the room?");
        assert_eq!(p.assignee_name.as_deref(), Some("Jason"));
    }

    #[test]
    fn test_deadline_searched_in_full_text_not_task() {
        let p = extract_task_and_deadline("By Monday, please review the draft.").unwrap();
        assert_eq!(p.task, "please review the draft.");
        assert_eq!(p.deadline_raw.as_deref(), Some("By Monday"));
    }

    #[test]
    fn test_two_word_task_is_rejected() {
        // Trigger found, but "please go." has only two words
        assert_eq!(extract_task_and_deadline("please go."), None);
    }

    #[test]
    fn test_no_trigger_no_action() {
        for text in [
            "The weather is nice today.",
            "I think that was a great quarter for everyone involved",
            "Jason, the room is booked",
        ] {
            assert_eq!(extract_task_and_deadline(text), None, "{text}");
        }
    }

    #[test]
    fn test_min_words_override() {
        let ex = Extractor::new(Strictness::Lenient).with_min_words(6);
        assert_eq!(ex.extract("please review the draft."), None);
        assert!(ex.extract("please review the draft with Maria today.").is_some());
    }

    // =====================================================================
    // Strict extraction
    // =====================================================================

    #[test]
    fn test_strict_strips_request_prefix() {
        let ex = Extractor::new(Strictness::Strict);
        let p = ex.extract("Okay, can you send the budget to finance by Friday?").unwrap();
        assert_eq!(p.task, "send the budget to finance by Friday?");
        assert_eq!(p.deadline_raw.as_deref(), Some("by Friday"));
    }

    #[test]
    fn test_strict_rejects_navigation() {
        let ex = Extractor::new(Strictness::Strict);
        assert_eq!(ex.extract("Okay, let's move on to the next topic."), None);
        assert!(Extractor::new(Strictness::Lenient)
            .extract("Okay, let's move on to the next topic.")
            .is_some());
    }

    #[test]
    fn test_strict_rejects_question_without_imperative() {
        let ex = Extractor::new(Strictness::Strict);
        assert_eq!(ex.extract("Could you tell me if the team will review the plan?"), None);
    }

    #[test]
    fn test_strict_accepts_imperative_question() {
        let ex = Extractor::new(Strictness::Strict);
        let p = ex
            .extract("Oh can you put a sign up on all the spaces Jason?")
            .unwrap();
        assert_eq!(p.task, "put a sign up on all the spaces Jason?");
    }

    // =====================================================================
    // Whole-utterance fallback
    // =====================================================================

    #[test]
    fn test_whole_utterance_lenient() {
        let ex = Extractor::default();
        let p = ex.whole_utterance("  book a table for six  ").unwrap();
        assert_eq!(p.task, "book a table for six");
        assert_eq!(p.deadline_raw, None);
        assert!(ex.whole_utterance("ok then").is_none());
    }

    #[test]
    fn test_whole_utterance_has_no_deadline_or_name() {
        let p = Extractor::default()
            .whole_utterance("Jason, the slides go out by Thursday")
            .unwrap();
        assert_eq!(p.task, "Jason, the slides go out by Thursday");
        assert_eq!(p.deadline_raw, None);
        assert_eq!(p.assignee_name, None);
    }

    #[test]
    fn test_whole_utterance_strict_applies_filters() {
        let ex = Extractor::new(Strictness::Strict);
        assert!(ex.whole_utterance("book a table for six people").is_some());
        assert!(ex.whole_utterance("that was a lovely dinner").is_none());
    }

    #[test]
    fn test_strictness_from_str() {
        assert_eq!("STRICT".parse::<Strictness>(), Ok(Strictness::Strict));
        assert!("loose".parse::<Strictness>().is_err());
    }
}
