//! Extra cleaning and filtering applied under [`Strictness::Strict`].
//!
//! [`Strictness::Strict`]: super::Strictness::Strict

/// Verbs that usually mark a concrete action.
pub const ACTION_VERBS: &[&str] = &[
    "send", "email", "share", "prepare", "update", "review", "finish", "complete", "report",
    "present", "schedule", "arrange", "organize", "follow", "follow-up", "call", "book", "draft",
    "finalize", "deliver", "submit", "assign", "decide", "agree", "explain", "refer", "address",
    "take", "put", "come", "wash", "pay", "clean", "respond", "reply", "check", "confirm", "think",
];

const MODALS: &[&str] = &["need", "should", "must"];

/// Meeting-navigation clauses that carry no task.
pub const NAVIGATION_STARTS: &[&str] = &[
    "we should get started",
    "let's get started",
    "lets get started",
    "let's get the ball rolling",
    "lets get the ball rolling",
    "let's move on to the next topic",
    "lets move on to the next topic",
    "let's move on to the next item",
    "lets move on to the next item",
    "let's move on to the next",
    "lets move on to the next",
    "let's move on",
    "lets move on",
    "let's start",
    "lets start",
    "let's take a look at",
    "lets take a look at",
    "let's make this the next red bull energy drink",
];

/// A task ending in one of these is usually cut off mid-thought.
const INCOMPLETE_ENDINGS: &[&str] = &[
    "for", "to", "of", "about", "at", "on", "up", "with", "letting", "than", "upcoming", "issue",
    "background", "again",
];

const JUNK_SUBSTRINGS: &[&str] = &["come and get back", "you should because you ride your bike"];

const QUESTION_WORDS: &[&str] = &["what", "why", "how", "who", "where", "when"];

const LEADING_FILLERS: &[&str] = &["okay", "ok", "well", "so", "right", "alright", "now", "fine"];

/// Polite wrappers stripped from the front of a task. First match wins.
const REQUEST_PREFIXES: &[&str] = &[
    "can you",
    "could you",
    "will you",
    "would you",
    "please can you",
    "please could you",
    "please will you",
    "please would you",
    "i think we should",
    "i think we need to",
    "we should",
    "we need to",
    "we ought to",
    "let's",
    "lets",
    "i will",
    "i'll",
    "we will",
    "we'll",
    "can we",
    "could we",
    "shall we",
    "should we",
    "let us",
    "i am going to",
    "we are going to",
    "i'm gonna",
    "we're gonna",
    "i am planning to",
    "we are planning to",
    "i intend to",
    "we intend to",
    "i was wondering if you could",
    "would it be possible to",
    "is there any chance you could",
    "i need you to",
    "we need you to",
    "i want you to",
    "we want you to",
    "id like you to",
    "wed like you to",
    "yo can you",
    "hey can you",
    "bro can you",
    "man can you",
    "listen can you",
    "ok can you",
    "hey let's",
    "ok let's",
];

/// Minimum words left after stripping a request prefix.
const MIN_WORDS_AFTER_PREFIX: usize = 2;

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '?' | '!')
}

/// Clean a raw task phrase. Returns `None` when nothing usable remains.
///
/// In order: drop a leading navigation clause up to its first terminator,
/// strip leading filler words repeatedly, then strip one polite request
/// prefix provided enough words remain.
pub fn clean_task_phrase(task: &str) -> Option<String> {
    let mut t = task.trim().to_string();
    if t.is_empty() {
        return None;
    }

    if NAVIGATION_STARTS
        .iter()
        .any(|nav| t.to_ascii_lowercase().starts_with(nav))
    {
        match t.find(is_terminator) {
            Some(idx) if idx + 1 < t.len() => t = t[idx + 1..].trim_start().to_string(),
            _ => return None,
        }
    }

    while let Some(rest) = strip_any_prefix(&t, LEADING_FILLERS) {
        t = rest.to_string();
    }

    if let Some(rest) = strip_any_prefix(&t, REQUEST_PREFIXES) {
        if rest.split_whitespace().count() < MIN_WORDS_AFTER_PREFIX {
            return None;
        }
        t = rest.to_string();
    }

    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

/// Strip the first of `prefixes` (followed by a space) from the front of `t`,
/// case-insensitively.
fn strip_any_prefix<'a>(t: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    let lower = t.to_ascii_lowercase();
    prefixes.iter().find_map(|p| {
        let n = p.len();
        let matched = lower.starts_with(p) && lower.as_bytes().get(n) == Some(&b' ');
        matched.then(|| t[n + 1..].trim_start())
    })
}

/// Final acceptance filter for a cleaned task.
///
/// `original` is the full utterance; a question-shaped utterance is only
/// kept when the task reads as an imperative.
pub fn is_strict_action(task: &str, original: &str, min_words: usize) -> bool {
    let t = task.trim();
    if t.is_empty() {
        return false;
    }
    let lower = t.to_lowercase();

    if JUNK_SUBSTRINGS.iter().any(|junk| lower.contains(junk)) {
        return false;
    }

    let words: Vec<String> = t
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | '?' | '!')).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() < min_words.max(1) {
        return false;
    }

    if NAVIGATION_STARTS.iter().any(|nav| lower.starts_with(nav)) {
        return false;
    }

    if QUESTION_WORDS.contains(&words[0].as_str()) {
        return false;
    }

    let is_verb = |w: &str| ACTION_VERBS.contains(&w);
    if !words.iter().any(|w| is_verb(w.as_str()) || MODALS.contains(&w.as_str())) {
        return false;
    }

    if original.trim().ends_with('?') {
        let first = words[0].as_str();
        let imperative = is_verb(first)
            || first == "please"
            || (first == "all" && words.get(1).is_some_and(|w| is_verb(w.as_str())));
        if !imperative {
            return false;
        }
    }

    if let Some(last) = words.last() {
        if INCOMPLETE_ENDINGS.contains(&last.as_str()) {
            return false;
        }
    }

    true
}
