pub mod analyzer;
pub mod config;
pub mod domain_utils;
pub mod error;
pub mod features;
pub mod heuristic;
pub mod machine_learning;
pub mod scoring;
pub mod training;
pub mod url_parts;

pub use analyzer::{AnalysisReport, UrlAnalyzer};
pub use error::{AnalyzeError, ExtractionError, ModelError, ScoreError};
pub use features::{
    extract_all_features, ExtractedFeatures, ExtractionMode, Feature, FeatureVector,
    FEATURE_SCHEMA,
};
pub use heuristic::{HeuristicVerdict, Verdict};
pub use machine_learning::{Classifier, FeatureOrder, SchemaPolicy};
pub use scoring::{HeuristicScorer, ModelScorer, Prediction, Scorer};
pub use url_parts::UrlParts;
