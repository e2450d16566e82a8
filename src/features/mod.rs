pub mod lexical;
pub mod structure;

use crate::error::ExtractionError;
use crate::heuristic::{self, HeuristicVerdict};
use crate::url_parts::UrlParts;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const FEATURE_COUNT: usize = 14;

/// One named URL signal. Declaration order is the canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    HasIpAddress,
    UrlLength,
    HasAtSymbol,
    HasDoubleSlash,
    NumDots,
    HasHttps,
    SubdomainDepth,
    PathDepth,
    HasSensitiveWords,
    HasHyphen,
    IsSuspiciousTld,
    IsShortened,
    BrandInSubdomainNotDomain,
    HasEncodedChars,
}

/// The feature schema shared by training rows and live predictions.
pub const FEATURE_SCHEMA: [Feature; FEATURE_COUNT] = [
    Feature::HasIpAddress,
    Feature::UrlLength,
    Feature::HasAtSymbol,
    Feature::HasDoubleSlash,
    Feature::NumDots,
    Feature::HasHttps,
    Feature::SubdomainDepth,
    Feature::PathDepth,
    Feature::HasSensitiveWords,
    Feature::HasHyphen,
    Feature::IsSuspiciousTld,
    Feature::IsShortened,
    Feature::BrandInSubdomainNotDomain,
    Feature::HasEncodedChars,
];

pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, url: &UrlParts) -> i64;
    fn name(&self) -> &str;
}

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::HasIpAddress => "hasIpAddress",
            Feature::UrlLength => "urlLength",
            Feature::HasAtSymbol => "hasAtSymbol",
            Feature::HasDoubleSlash => "hasDoubleSlash",
            Feature::NumDots => "numDots",
            Feature::HasHttps => "hasHttps",
            Feature::SubdomainDepth => "subdomainDepth",
            Feature::PathDepth => "pathDepth",
            Feature::HasSensitiveWords => "hasSensitiveWords",
            Feature::HasHyphen => "hasHyphen",
            Feature::IsSuspiciousTld => "isSuspiciousTld",
            Feature::IsShortened => "isShortened",
            Feature::BrandInSubdomainNotDomain => "brandInSubdomainNotDomain",
            Feature::HasEncodedChars => "hasEncodedChars",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FEATURE_SCHEMA.into_iter().find(|f| f.name() == name)
    }

    /// Position in the schema.
    pub fn index(self) -> usize {
        self as usize
    }

    /// 0/1 indicators, as opposed to counts and lengths.
    pub fn is_indicator(self) -> bool {
        !matches!(
            self,
            Feature::UrlLength | Feature::NumDots | Feature::SubdomainDepth | Feature::PathDepth
        )
    }
}

impl FeatureExtractor for Feature {
    fn extract(&self, url: &UrlParts) -> i64 {
        let raw = url.raw();
        let host = url.host();
        match self {
            Feature::HasIpAddress => lexical::has_ip_address(raw),
            Feature::UrlLength => lexical::url_length(raw),
            Feature::HasAtSymbol => lexical::has_at_symbol(raw),
            Feature::HasDoubleSlash => lexical::has_double_slash(raw),
            Feature::NumDots => structure::num_dots(host),
            Feature::HasHttps => lexical::has_https(raw),
            Feature::SubdomainDepth => structure::subdomain_depth(host),
            Feature::PathDepth => structure::path_depth(url.path()),
            Feature::HasSensitiveWords => lexical::has_sensitive_words(raw),
            Feature::HasHyphen => structure::has_hyphen(host),
            Feature::IsSuspiciousTld => structure::is_suspicious_tld(host),
            Feature::IsShortened => lexical::is_shortened(raw),
            Feature::BrandInSubdomainNotDomain => structure::brand_in_subdomain_not_domain(host),
            Feature::HasEncodedChars => lexical::has_encoded_chars(raw),
        }
    }

    fn name(&self) -> &str {
        Feature::name(*self)
    }
}

/// Every schema feature with its value, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureVector {
    values: [i64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_url(url: &UrlParts) -> Self {
        let mut values = [0; FEATURE_COUNT];
        for feature in FEATURE_SCHEMA {
            values[feature.index()] = feature.extract(url);
        }
        Self { values }
    }

    pub fn value(&self, feature: Feature) -> i64 {
        self.values[feature.index()]
    }

    /// Lookup by wire name; `None` for names outside the schema.
    pub fn get(&self, name: &str) -> Option<i64> {
        Feature::from_name(name).map(|f| self.value(f))
    }

    pub fn with_value(mut self, feature: Feature, value: i64) -> Self {
        self.values[feature.index()] = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, i64)> + '_ {
        FEATURE_SCHEMA.into_iter().map(|f| (f, self.value(f)))
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.name(), &value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Live prediction: the heuristic verdict is attached.
    Inference,
    /// Dataset rows: verdict fields must stay out of the predictors.
    Training,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedFeatures {
    #[serde(flatten)]
    pub features: FeatureVector,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<HeuristicVerdict>,
}

/// Parse `url` and run every extractor over it.
pub fn extract_all_features(
    url: &str,
    mode: ExtractionMode,
) -> Result<ExtractedFeatures, ExtractionError> {
    let parts = UrlParts::parse(url)?;
    let features = FeatureVector::from_url(&parts);

    let verdict = match mode {
        ExtractionMode::Inference => Some(heuristic::evaluate(&features)),
        ExtractionMode::Training => None,
    };

    Ok(ExtractedFeatures { features, verdict })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Verdict;

    fn features_of(url: &str) -> FeatureVector {
        extract_all_features(url, ExtractionMode::Training)
            .unwrap()
            .features
    }

    #[test]
    fn test_schema_names_roundtrip() {
        for (i, feature) in FEATURE_SCHEMA.into_iter().enumerate() {
            assert_eq!(feature.index(), i);
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("threatConfidence"), None);
    }

    #[test]
    fn test_schema_completeness() {
        let json = serde_json::to_value(features_of("https://www.example.com/")).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 14);
        for feature in FEATURE_SCHEMA {
            assert!(object.contains_key(feature.name()), "{}", feature.name());
        }
    }

    #[test]
    fn test_serialized_in_schema_order() {
        let json = serde_json::to_string(&features_of("http://a.b")).unwrap();
        let mut last = 0;
        for feature in FEATURE_SCHEMA {
            let pos = json.find(&format!("\"{}\"", feature.name())).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn test_determinism() {
        let urls = [
            "https://secure-paypal.update-login.com/account/reset",
            "http://192.168.1.1/login",
            "",
            "not a url at all",
            "https://bit.ly/%41",
        ];
        for url in urls {
            let first = extract_all_features(url, ExtractionMode::Inference).unwrap();
            let second = extract_all_features(url, ExtractionMode::Inference).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_range_invariants() {
        let urls = [
            "https://secure-paypal.update-login.com/account/reset",
            "http://user@192.168.1.1//x/%2e",
            "localhost",
            "",
            "https://a.b.c.d.e.f.g.tk/a/b/c",
            "mailto:someone@example.com",
        ];
        for url in urls {
            for (feature, value) in features_of(url).iter() {
                if feature.is_indicator() {
                    assert!(value == 0 || value == 1, "{} = {}", feature.name(), value);
                } else if feature == Feature::SubdomainDepth {
                    assert!(value >= -1);
                } else {
                    assert!(value >= 0, "{} = {}", feature.name(), value);
                }
            }
        }
    }

    #[test]
    fn test_phishing_scenario_features() {
        let f = features_of("https://secure-paypal.update-login.com/account/reset");
        assert_eq!(f.get("hasSensitiveWords"), Some(1));
        assert_eq!(f.get("hasHyphen"), Some(1));
        assert_eq!(f.get("brandInSubdomainNotDomain"), Some(1));
        assert_eq!(f.get("hasHttps"), Some(1));
        assert_eq!(f.get("hasIpAddress"), Some(0));
        assert_eq!(f.get("isShortened"), Some(0));
        assert_eq!(f.get("numDots"), Some(2));
        assert_eq!(f.get("subdomainDepth"), Some(1));
        assert_eq!(f.get("pathDepth"), Some(2));
        assert_eq!(f.get("urlLength"), Some(52));
    }

    #[test]
    fn test_ip_scenario_features() {
        let f = features_of("http://192.168.1.1/login");
        assert_eq!(f.value(Feature::HasIpAddress), 1);
        assert_eq!(f.value(Feature::HasHttps), 0);
        assert_eq!(f.value(Feature::HasSensitiveWords), 1);
        assert_eq!(f.value(Feature::NumDots), 3);
        assert_eq!(f.value(Feature::SubdomainDepth), 2);
    }

    #[test]
    fn test_safe_scenario_features() {
        let f = features_of("https://www.example.com/");
        for (feature, value) in f.iter() {
            if feature.is_indicator() && feature != Feature::HasHttps {
                assert_eq!(value, 0, "{}", feature.name());
            }
        }
        assert_eq!(f.value(Feature::HasHttps), 1);
    }

    #[test]
    fn test_schemeless_url_has_empty_host() {
        let f = features_of("paypal.login.example.com/secure");
        assert_eq!(f.value(Feature::NumDots), 0);
        assert_eq!(f.value(Feature::SubdomainDepth), -1);
        assert_eq!(f.value(Feature::BrandInSubdomainNotDomain), 0);
        assert_eq!(f.value(Feature::PathDepth), 1);
        assert_eq!(f.value(Feature::HasSensitiveWords), 1);
    }

    #[test]
    fn test_training_mode_omits_verdict() {
        let extracted =
            extract_all_features("http://192.168.1.1/login", ExtractionMode::Training).unwrap();
        assert!(extracted.verdict.is_none());

        let json = serde_json::to_value(&extracted).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("threatConfidence"));
        assert!(!object.contains_key("verdict"));
        assert_eq!(object.len(), 14);
    }

    #[test]
    fn test_inference_mode_attaches_verdict() {
        let extracted =
            extract_all_features("http://192.168.1.1/login", ExtractionMode::Inference).unwrap();
        let verdict = extracted.verdict.unwrap();
        assert_eq!(verdict.verdict, Verdict::Phishing);

        let json = serde_json::to_value(&extracted).unwrap();
        assert_eq!(json["verdict"], "Phishing");
        assert_eq!(json["threatConfidence"], 70.0);
        assert_eq!(json["hasIpAddress"], 1);
    }

    #[test]
    fn test_extraction_failure_is_returned() {
        assert!(extract_all_features("http://[::1/login", ExtractionMode::Inference).is_err());
        assert!(extract_all_features("http://[abc]/login", ExtractionMode::Training).is_err());
        assert!(
            extract_all_features("http://ex\u{ff03}ample.com/", ExtractionMode::Training).is_err()
        );
    }
}
