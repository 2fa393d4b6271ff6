pub mod linear;

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::extract::Extractor;
use crate::models::ParsedAction;

pub use linear::LinearModel;

/// Probability at or above which the classifier calls an utterance an action.
pub const DEFAULT_THRESHOLD: f64 = 0.40;

/// Binary action/non-action classifier.
pub trait ActionClassifier {
    /// Probability in `[0, 1]` that `text` is an action item.
    fn predict_probability(&self, text: &str) -> Result<f64, ModelError>;
}

/// Strategy deciding whether an utterance is an action item.
pub trait ActionGate {
    /// Gate name for logs and reports.
    fn name(&self) -> &str;

    fn is_action(&self, text: &str, extractor: &Extractor) -> bool;

    /// Parse of an accepted utterance, or `None` when the gate rejects it.
    /// Text the trigger rules cannot parse becomes a whole-utterance task.
    fn accept(&self, text: &str, extractor: &Extractor) -> Option<ParsedAction> {
        if !self.is_action(text, extractor) {
            return None;
        }
        extractor
            .extract(text)
            .or_else(|| extractor.whole_utterance(text))
    }
}

/// Trigger-rule gate: an utterance is an action when the extractor accepts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleGate;

impl ActionGate for RuleGate {
    fn name(&self) -> &str {
        "rules"
    }

    fn is_action(&self, text: &str, extractor: &Extractor) -> bool {
        extractor.extract(text).is_some()
    }

    fn accept(&self, text: &str, extractor: &Extractor) -> Option<ParsedAction> {
        extractor.extract(text)
    }
}

/// Classifier gate with a probability threshold. A failed prediction falls
/// back to the rule gate for that utterance.
pub struct ClassifierGate {
    classifier: Box<dyn ActionClassifier>,
    threshold: f64,
}

impl ClassifierGate {
    pub fn new(classifier: Box<dyn ActionClassifier>, threshold: f64) -> Self {
        ClassifierGate { classifier, threshold }
    }
}

impl ActionGate for ClassifierGate {
    fn name(&self) -> &str {
        "classifier"
    }

    fn is_action(&self, text: &str, extractor: &Extractor) -> bool {
        match self.classifier.predict_probability(text) {
            Ok(p) => {
                debug!("p(action) = {p:.3} for {text:?}");
                p >= self.threshold
            }
            Err(e) => {
                warn!("Classifier failed ({e}); using rules for this utterance");
                RuleGate.is_action(text, extractor)
            }
        }
    }
}

/// Build the gate for a run: the classifier at `model_path` if it loads,
/// otherwise the rule gate.
pub fn gate_for_model(model_path: Option<&Path>, threshold: f64) -> Box<dyn ActionGate> {
    let Some(path) = model_path else {
        return Box::new(RuleGate);
    };

    match LinearModel::load(path) {
        Ok(model) => {
            info!("Loaded classifier: {} ({} features)", path.display(), model.weights.len());
            Box::new(ClassifierGate::new(Box::new(model), threshold))
        }
        Err(e) => {
            warn!("Classifier not loaded from {} ({e}); falling back to rules only", path.display());
            Box::new(RuleGate)
        }
    }
}
