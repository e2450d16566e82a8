use thiserror::Error;

/// Raised when a URL cannot be split into components at all.
///
/// Missing schemes or hosts are not errors; they degrade to empty
/// components. Only structurally broken or disguised authorities end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("malformed host '{host}' in '{url}': unbalanced IPv6 brackets")]
    MalformedHost { url: String, host: String },
    #[error("malformed host '{host}' in '{url}': bracketed part is not an IPv6 or IPvFuture literal")]
    InvalidBracketedHost { url: String, host: String },
    #[error("malformed host '{host}' in '{url}': contains invalid characters under NFKC normalization")]
    NormalizedDelimiter { url: String, host: String },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("model has {coefficients} coefficients but feature order lists {features} names")]
    DimensionMismatch { coefficients: usize, features: usize },
    #[error("feature order references unknown features: {}", unknown.join(", "))]
    SchemaMismatch { unknown: Vec<String> },
    #[error("decision threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("classifier returned probability {0}, expected a value in [0, 1]")]
    InvalidProbability(f64),
    #[error("classifier '{name}' failed: {message}")]
    Classifier { name: String, message: String },
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("No URL provided")]
    MissingUrl,
    #[error("Feature extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoreError),
}
