//! Model-free URL scoring.
//!
//! A fixed weighted sum over a handful of indicators, scaled into a
//! 0-100 threat confidence. Needs no state beyond the feature vector.

use crate::features::{Feature, FeatureVector};
use serde::Serialize;

/// Raw scores at or above this are called phishing.
pub const PHISHING_THRESHOLD: f64 = 3.5;

/// Raw score to percentage factor.
const CONFIDENCE_SCALE: f64 = 20.0;

const WEIGHTS: [(Feature, f64); 5] = [
    (Feature::HasIpAddress, 2.0),
    (Feature::HasSensitiveWords, 2.0),
    (Feature::HasHyphen, 1.5),
    (Feature::IsShortened, 2.0),
    (Feature::BrandInSubdomainNotDomain, 3.0),
];

/// Applied when the URL does not start with `https`.
const MISSING_HTTPS_PENALTY: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Phishing,
    #[serde(rename = "Likely Safe")]
    LikelySafe,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Phishing => "Phishing",
            Verdict::LikelySafe => "Likely Safe",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicVerdict {
    pub threat_confidence: f64,
    pub verdict: Verdict,
    #[serde(skip)]
    pub raw_score: f64,
}

/// Weighted indicator sum before scaling. Can be negative.
pub fn raw_score(features: &FeatureVector) -> f64 {
    let weighted: f64 = WEIGHTS
        .iter()
        .map(|&(feature, weight)| weight * features.value(feature) as f64)
        .sum();

    let https_adjustment = if features.value(Feature::HasHttps) == 0 {
        MISSING_HTTPS_PENALTY
    } else {
        0.0
    };

    weighted + https_adjustment
}

pub fn evaluate(features: &FeatureVector) -> HeuristicVerdict {
    let raw = raw_score(features);
    let threat_confidence = round_to_hundredths((raw * CONFIDENCE_SCALE).clamp(0.0, 100.0));

    let verdict = if raw >= PHISHING_THRESHOLD {
        Verdict::Phishing
    } else {
        Verdict::LikelySafe
    };

    HeuristicVerdict {
        threat_confidence,
        verdict,
        raw_score: raw,
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
