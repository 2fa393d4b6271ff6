use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{Utterance, UNKNOWN_SPEAKER};

/// Speech-to-text output: either a bare segment array or `{"segments": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonTranscript {
    Segments(Vec<JsonSegment>),
    Wrapped { segments: Vec<JsonSegment> },
}

/// One transcribed segment. Other fields (timings, confidences) are ignored.
#[derive(Debug, Deserialize)]
pub struct JsonSegment {
    pub speaker: Option<String>,
    pub text: Option<String>,
}

/// Parse a speech-to-text JSON document into utterances.
/// Segments without a speaker label belong to the unknown speaker.
pub fn parse_json(content: &str) -> Result<Vec<Utterance>> {
    let jt: JsonTranscript =
        serde_json::from_str(content).context("Failed to parse JSON transcript")?;

    let segments = match jt {
        JsonTranscript::Segments(s) => s,
        JsonTranscript::Wrapped { segments } => segments,
    };

    let utterances = segments
        .into_iter()
        .filter_map(|s| {
            let text = s.text.unwrap_or_default().trim().to_string();
            if text.is_empty() {
                return None;
            }
            let speaker = s
                .speaker
                .map(|spk| spk.trim().to_string())
                .filter(|spk| !spk.is_empty())
                .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());
            Some(Utterance { speaker, text })
        })
        .collect();

    Ok(utterances)
}
