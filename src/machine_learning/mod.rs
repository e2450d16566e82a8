//! Adapter between feature vectors and trained classifiers.
//!
//! A classifier only ever sees a dense `[f64]` whose columns follow the
//! feature order recorded when it was trained. That order is loaded from
//! its own artefact and may not match the current schema exactly.

use crate::error::{ModelError, ScoreError};
use crate::features::{Feature, FeatureVector, FEATURE_SCHEMA};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Anything features can be looked up in by wire name.
pub trait FeatureSource {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl FeatureSource for FeatureVector {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).map(|v| v as f64)
    }
}

impl FeatureSource for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// A binary phishing classifier over projected vectors.
pub trait Classifier: Send + Sync {
    /// `true` for the phishing class.
    fn predict(&self, vector: &[f64]) -> Result<bool, ScoreError>;
    /// Probability of the phishing class.
    fn predict_score(&self, vector: &[f64]) -> Result<f64, ScoreError>;
    fn name(&self) -> &str;
}

/// How to treat training-time feature names the current schema lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPolicy {
    /// Warn and project unknown names as 0.
    #[default]
    Lenient,
    /// Refuse to build a scorer over a mismatched order.
    Strict,
}

/// Column order a model was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureOrder {
    names: Vec<String>,
}

impl FeatureOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The current schema in canonical order.
    pub fn schema() -> Self {
        Self::new(FEATURE_SCHEMA.iter().map(|f| f.name()))
    }

    /// Read a JSON array of feature names.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Dense vector in this order. Names missing from `source` become 0;
    /// entries of `source` not named here are dropped.
    pub fn project<S: FeatureSource + ?Sized>(&self, source: &S) -> Vec<f64> {
        self.names
            .iter()
            .map(|name| source.lookup(name).unwrap_or(0.0))
            .collect()
    }

    /// Names the current schema cannot supply.
    pub fn unknown_names(&self) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| Feature::from_name(name).is_none())
            .cloned()
            .collect()
    }

    /// Schema features this order never asks for.
    pub fn unused_features(&self) -> Vec<Feature> {
        FEATURE_SCHEMA
            .into_iter()
            .filter(|f| !self.names.iter().any(|n| n == f.name()))
            .collect()
    }

    /// Compare against the schema and apply `policy`.
    pub fn check_schema(&self, policy: SchemaPolicy) -> Result<(), ModelError> {
        let unknown = self.unknown_names();
        if !unknown.is_empty() {
            match policy {
                SchemaPolicy::Strict => return Err(ModelError::SchemaMismatch { unknown }),
                SchemaPolicy::Lenient => log::warn!(
                    "Feature order lists {} name(s) outside the schema, projecting as 0: {}",
                    unknown.len(),
                    unknown.join(", ")
                ),
            }
        }

        let unused = self.unused_features();
        if !unused.is_empty() {
            log::debug!(
                "Model ignores schema features: {}",
                unused.iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
            );
        }

        Ok(())
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic-regression classifier read from a JSON artefact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>, threshold: f64) -> Result<Self, ModelError> {
        let model = Self {
            intercept,
            coefficients,
            threshold,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: LogisticModel =
            serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        model.validate()?;

        log::info!(
            "Loaded logistic model from {} ({} coefficients, threshold {})",
            path.display(),
            model.coefficients.len(),
            model.threshold
        );
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ModelError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Coefficients must line up one-to-one with the training columns.
    pub fn check_dimensions(&self, order: &FeatureOrder) -> Result<(), ModelError> {
        if self.coefficients.len() != order.len() {
            return Err(ModelError::DimensionMismatch {
                coefficients: self.coefficients.len(),
                features: order.len(),
            });
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, vector: &[f64]) -> Result<bool, ScoreError> {
        Ok(self.predict_score(vector)? >= self.threshold)
    }

    fn predict_score(&self, vector: &[f64]) -> Result<f64, ScoreError> {
        if vector.len() != self.coefficients.len() {
            return Err(ScoreError::Classifier {
                name: self.name().to_string(),
                message: format!(
                    "expected {} columns, got {}",
                    self.coefficients.len(),
                    vector.len()
                ),
            });
        }

        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(vector)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn name(&self) -> &str {
        "logistic"
    }
}
