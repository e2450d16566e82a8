//! Dataset rows for model fitting.
//!
//! Rows carry only the schema predictors and an externally supplied label.
//! Heuristic verdict fields never appear here, so the target cannot leak
//! into the feature columns.

use crate::features::{extract_all_features, ExtractionMode, FeatureVector, FEATURE_SCHEMA};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Label {
    Legitimate,
    Phishing,
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        match label {
            Label::Legitimate => 0,
            Label::Phishing => 1,
        }
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Legitimate),
            1 => Ok(Label::Phishing),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRow {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub label: Label,
}

/// Extract training rows, skipping (and logging) URLs that fail.
pub fn build_training_rows<I, S>(urls: I, label: Label) -> Vec<TrainingRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for url in urls {
        let url = url.as_ref();
        match extract_all_features(url, ExtractionMode::Training) {
            Ok(extracted) => rows.push(TrainingRow {
                features: extracted.features,
                label,
            }),
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping training URL {}: {}", url, e);
            }
        }
    }

    log::info!(
        "Built {} {:?} training rows ({} skipped)",
        rows.len(),
        label,
        skipped
    );
    rows
}

/// Column order to persist alongside a model fitted on these rows.
pub fn feature_order() -> Vec<&'static str> {
    FEATURE_SCHEMA.iter().map(|f| f.name()).collect()
}
