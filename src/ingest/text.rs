use regex::Regex;
use std::sync::OnceLock;

use crate::models::{Utterance, UNKNOWN_SPEAKER};

/// Parse a line-oriented transcript into utterances.
///
/// Each non-blank line becomes one utterance. `SPEAKER: text` splits on the
/// first colon; `Speaker - text` is accepted when there is no colon. Lines
/// with neither prefix belong to [`UNKNOWN_SPEAKER`]; the previous speaker
/// is never carried forward. Lines whose text is empty after the label are
/// dropped.
pub fn parse_text(content: &str) -> Vec<Utterance> {
    content.lines().filter_map(parse_line).collect()
}

/// Parse one transcript line. Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Utterance> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (speaker, text) = match line.split_once(':') {
        Some((spk, txt)) => {
            let spk = spk.trim();
            let speaker = if spk.is_empty() { UNKNOWN_SPEAKER } else { spk };
            (speaker, txt.trim())
        }
        None => match split_dash_label(line) {
            Some((spk, txt)) => (spk, txt),
            None => (UNKNOWN_SPEAKER, line),
        },
    };

    if text.is_empty() {
        return None;
    }
    Some(Utterance::new(speaker, text))
}

/// Interjections that open sentences like "Okay - we ship it"; never speaker labels.
const NON_SPEAKER_WORDS: &[&str] = &[
    "okay", "ok", "so", "well", "yes", "yeah", "no", "right", "alright", "sure", "also", "and",
    "but", "then", "now", "oh", "um", "uh", "hmm", "anyway", "fine", "great", "thanks", "look",
    "listen",
];

/// `Alice - text` or `Alice- text`: a single capitalized word, then a dash.
fn split_dash_label(line: &str) -> Option<(&str, &str)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^([A-Z][A-Za-z]*)\s?-\s+(.*)$").expect("Invalid dash label regex")
    });
    let caps = re.captures(line)?;
    let speaker = caps.get(1)?.as_str();
    if NON_SPEAKER_WORDS.contains(&speaker.to_ascii_lowercase().as_str()) {
        return None;
    }
    let text = caps.get(2)?.as_str().trim();
    Some((speaker, text))
}
