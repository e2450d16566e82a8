//! Interchangeable ways of turning a feature vector into a prediction.

use crate::config::{Config, ScoringMode};
use crate::error::{ModelError, ScoreError};
use crate::features::FeatureVector;
use crate::heuristic::{self, round_to_hundredths, Verdict};
use crate::machine_learning::{Classifier, FeatureOrder, LogisticModel, SchemaPolicy};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Heuristic,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub is_phishing: bool,
    /// Percentage in [0, 100], two decimals.
    pub confidence: f64,
    pub source: ScoreSource,
}

pub trait Scorer: Send + Sync {
    fn score(&self, features: &FeatureVector) -> Result<Prediction, ScoreError>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl Scorer for HeuristicScorer {
    fn score(&self, features: &FeatureVector) -> Result<Prediction, ScoreError> {
        let verdict = heuristic::evaluate(features);
        Ok(Prediction {
            is_phishing: verdict.verdict == Verdict::Phishing,
            confidence: verdict.threat_confidence,
            source: ScoreSource::Heuristic,
        })
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Projects vectors into the training-time column order before asking the
/// classifier.
pub struct ModelScorer {
    classifier: Box<dyn Classifier>,
    order: FeatureOrder,
}

impl ModelScorer {
    pub fn new(
        classifier: Box<dyn Classifier>,
        order: FeatureOrder,
        policy: SchemaPolicy,
    ) -> Result<Self, ModelError> {
        order.check_schema(policy)?;
        Ok(Self { classifier, order })
    }

    pub fn order(&self) -> &FeatureOrder {
        &self.order
    }
}

impl Scorer for ModelScorer {
    fn score(&self, features: &FeatureVector) -> Result<Prediction, ScoreError> {
        let vector = self.order.project(features);
        let is_phishing = self.classifier.predict(&vector)?;
        let probability = self.classifier.predict_score(&vector)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoreError::InvalidProbability(probability));
        }

        Ok(Prediction {
            is_phishing,
            confidence: round_to_hundredths(probability * 100.0),
            source: ScoreSource::Model,
        })
    }

    fn name(&self) -> &str {
        self.classifier.name()
    }
}

/// Build the scorer once at startup; it is read-only afterwards.
pub fn scorer_from_config(config: &Config) -> Result<Arc<dyn Scorer>> {
    match config.scoring.mode {
        ScoringMode::Heuristic => {
            log::info!("Using heuristic scorer");
            Ok(Arc::new(HeuristicScorer))
        }
        ScoringMode::Model => {
            let model_path = config
                .scoring
                .model_path
                .as_ref()
                .context("scoring.model_path is not set")?;
            let order_path = config
                .scoring
                .feature_order_path
                .as_ref()
                .context("scoring.feature_order_path is not set")?;

            let model = LogisticModel::load_from_file(model_path)?;
            let order = FeatureOrder::load_from_file(order_path)?;
            model.check_dimensions(&order)?;

            let scorer = ModelScorer::new(Box::new(model), order, config.scoring.schema_policy)?;
            log::info!(
                "Using model scorer '{}' over {} features",
                scorer.name(),
                scorer.order().len()
            );
            Ok(Arc::new(scorer))
        }
    }
}
