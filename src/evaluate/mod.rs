//! Set-based precision/recall of predicted action records against a gold file.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

use crate::models::LooseRecord;
use crate::output::json::read_loose;

/// Match scores for one predictions/gold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key: `assignee | action_item`, both normalized. Missing fields are empty.
pub fn key(record: &LooseRecord) -> String {
    format!(
        "{} | {}",
        normalize(record.assignee.as_deref().unwrap_or("")),
        normalize(record.action_item.as_deref().unwrap_or(""))
    )
}

pub fn evaluate(predicted: &[LooseRecord], gold: &[LooseRecord]) -> Evaluation {
    let pred: BTreeSet<String> = predicted.iter().map(key).collect();
    let gold: BTreeSet<String> = gold.iter().map(key).collect();

    let tp = pred.intersection(&gold).count();
    let fp = pred.difference(&gold).count();
    let fn_ = gold.difference(&pred).count();

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Evaluation {
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        precision,
        recall,
        f1,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Evaluate two record files. Returns `None` when either file is missing.
pub fn evaluate_files(predictions: &Path, gold: &Path) -> Result<Option<Evaluation>> {
    for path in [predictions, gold] {
        if !path.exists() {
            warn!("Missing file for evaluation: {}", path.display());
            return Ok(None);
        }
    }
    let pred = read_loose(predictions)?;
    let gold = read_loose(gold)?;
    Ok(Some(evaluate(&pred, &gold)))
}
