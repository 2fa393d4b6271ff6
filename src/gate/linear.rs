use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use super::ActionClassifier;
use crate::error::ModelError;

/// Logistic model over lowercased unigram and bigram features.
///
/// Stored as JSON: `{"bias": -1.2, "weights": {"send": 0.8, "can you": 1.4}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModel {
    pub bias: f64,
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let model: LinearModel = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !self.bias.is_finite() {
            return Err(ModelError::Invalid("bias is not finite".to_string()));
        }
        if let Some((feature, _)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ModelError::Invalid(format!("weight for \"{feature}\" is not finite")));
        }
        Ok(())
    }

    fn score(&self, text: &str) -> f64 {
        self.bias
            + features(text)
                .iter()
                .filter_map(|f| self.weights.get(f))
                .sum::<f64>()
    }
}

impl ActionClassifier for LinearModel {
    fn predict_probability(&self, text: &str) -> Result<f64, ModelError> {
        let p = sigmoid(self.score(text));
        if p.is_nan() {
            return Err(ModelError::Invalid("probability is NaN".to_string()));
        }
        Ok(p)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Distinct unigrams and bigrams of word tokens (two or more word characters).
pub fn features(text: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"));

    let lower = text.to_lowercase();
    let tokens: Vec<&str> = re.find_iter(&lower).map(|m| m.as_str()).collect();

    let mut out: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    out.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    out.sort();
    out.dedup();
    out
}
