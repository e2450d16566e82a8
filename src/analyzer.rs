use crate::error::AnalyzeError;
use crate::features::{extract_all_features, ExtractedFeatures, ExtractionMode};
use crate::scoring::{HeuristicScorer, Prediction, Scorer};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub url: String,
    pub prediction: Prediction,
    pub features: ExtractedFeatures,
}

/// Live-prediction entry point. Cheap to clone and safe to share between
/// threads; the scorer is never mutated after construction.
#[derive(Clone)]
pub struct UrlAnalyzer {
    scorer: Arc<dyn Scorer>,
}

impl Default for UrlAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicScorer))
    }
}

impl UrlAnalyzer {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub fn analyze(&self, url: &str) -> Result<AnalysisReport, AnalyzeError> {
        if url.trim().is_empty() {
            return Err(AnalyzeError::MissingUrl);
        }

        let features = extract_all_features(url, ExtractionMode::Inference).map_err(|e| {
            log::error!("Feature extraction failed for {}: {}", url, e);
            AnalyzeError::from(e)
        })?;

        let prediction = self.scorer.score(&features.features).map_err(|e| {
            log::error!("Scorer '{}' failed for {}: {}", self.scorer.name(), url, e);
            AnalyzeError::from(e)
        })?;

        log::debug!(
            "{} -> phishing={} confidence={} ({})",
            url,
            prediction.is_phishing,
            prediction.confidence,
            self.scorer.name()
        );

        Ok(AnalysisReport {
            url: url.to_string(),
            prediction,
            features,
        })
    }

    /// One result per input, in input order.
    pub fn analyze_batch<I, S>(&self, urls: I) -> Vec<Result<AnalysisReport, AnalyzeError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter().map(|url| self.analyze(url.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Verdict;
    use crate::machine_learning::{FeatureOrder, LogisticModel, SchemaPolicy};
    use crate::scoring::ModelScorer;
    use std::thread;

    #[test]
    fn test_report_shape() {
        let report = UrlAnalyzer::default()
            .analyze("https://secure-paypal.update-login.com/account/reset")
            .unwrap();
        assert!(report.prediction.is_phishing);
        assert_eq!(report.prediction.confidence, 100.0);
        assert_eq!(
            report.features.verdict.map(|v| v.verdict),
            Some(Verdict::Phishing)
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["url"], "https://secure-paypal.update-login.com/account/reset");
        assert_eq!(json["prediction"]["isPhishing"], true);
        assert_eq!(json["prediction"]["confidence"], 100.0);
        assert_eq!(json["prediction"]["source"], "heuristic");
        assert_eq!(json["features"]["brandInSubdomainNotDomain"], 1);
        assert_eq!(json["features"]["verdict"], "Phishing");
        assert_eq!(json["features"].as_object().unwrap().len(), 16);
    }

    #[test]
    fn test_scorer_name() {
        assert_eq!(UrlAnalyzer::default().scorer_name(), "heuristic");

        let model = LogisticModel::new(0.0, vec![1.0], 0.5).unwrap();
        let scorer = ModelScorer::new(
            Box::new(model),
            FeatureOrder::new(["hasIpAddress"]),
            SchemaPolicy::Strict,
        )
        .unwrap();
        assert_eq!(UrlAnalyzer::new(Arc::new(scorer)).scorer_name(), "logistic");
    }

    #[test]
    fn test_missing_url() {
        let analyzer = UrlAnalyzer::default();
        assert!(matches!(analyzer.analyze(""), Err(AnalyzeError::MissingUrl)));
        assert!(matches!(analyzer.analyze("  \t"), Err(AnalyzeError::MissingUrl)));
    }

    #[test]
    fn test_extraction_failure_is_a_result() {
        let err = UrlAnalyzer::default()
            .analyze("https://[fe80::1/login")
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Extraction(_)));
        assert!(err.to_string().starts_with("Feature extraction failed"));
    }

    #[test]
    fn test_batch_keeps_order_and_failures() {
        let results = UrlAnalyzer::default().analyze_batch([
            "https://www.example.com/",
            "",
            "http://192.168.1.1/login",
        ]);
        assert_eq!(results.len(), 3);
        assert!(!results[0].as_ref().unwrap().prediction.is_phishing);
        assert!(results[1].is_err());
        assert!(results[2].as_ref().unwrap().prediction.is_phishing);
    }

    #[test]
    fn test_shared_across_threads() {
        let analyzer = UrlAnalyzer::default();
        let urls = [
            "http://192.168.1.1/login",
            "https://www.example.com/",
            "https://bit.ly/x",
            "https://paypal.com.evil.tk/",
        ];
        let expected: Vec<_> = urls.iter().map(|u| analyzer.analyze(u).unwrap()).collect();

        thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| urls.map(|u| analyzer.analyze(u).unwrap())))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().to_vec(), expected);
            }
        });
    }
}
