//! Analysis configuration, supplied by the caller as explicit parameters.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Language;

/// How to break ties when several symbols match a call reference equally
/// well. Dead-code results are sensitive to this choice, so it is a knob
/// rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    /// One edge per tied candidate, each marked ambiguous.
    #[default]
    FanOut,
    /// Pick the first candidate by (file path, start line).
    FirstCandidate,
}

/// Duplicate detection tuning. The defaults are heuristic, not protocol
/// constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Jaccard similarity over normalized token 3-grams required to pair
    /// two symbols.
    pub similarity_threshold: f64,
    /// Bodies at or below this many normalized tokens are never compared;
    /// trivial getters pair too easily.
    pub min_body_tokens: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        DuplicateConfig {
            similarity_threshold: 0.8,
            min_body_tokens: 10,
        }
    }
}

/// Full configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Languages to analyze; files of other languages are skipped by the
    /// scanner.
    pub languages: Vec<Language>,
    /// Bare names treated as program entry points for dead-code purposes.
    pub entry_point_names: Vec<String>,
    /// Symbols whose bare name matches are treated as test entry points.
    pub test_name_pattern: String,
    pub duplicates: DuplicateConfig,
    pub resolution: ResolutionPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            languages: Language::all().to_vec(),
            entry_point_names: [
                "main", "__main__", "__init__", "run", "start", "setup", "setUp", "tearDown",
                "loop", "init",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            test_name_pattern: r"^(test_|Test[A-Z])|_test$".to_string(),
            duplicates: DuplicateConfig::default(),
            resolution: ResolutionPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject invalid settings before any analysis starts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.languages.is_empty() {
            return Err(Error::EmptyLanguageSet);
        }
        let threshold = self.duplicates.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
            return Err(Error::InvalidThreshold(threshold));
        }
        if self.duplicates.min_body_tokens == 0 {
            return Err(Error::ZeroMinTokens);
        }
        self.test_name_regex()?;
        Ok(())
    }

    /// Compile the test-name convention.
    pub fn test_name_regex(&self) -> Result<Regex, Error> {
        Regex::new(&self.test_name_pattern).map_err(|source| Error::InvalidTestPattern {
            pattern: self.test_name_pattern.clone(),
            source: Box::new(source),
        })
    }

    pub fn is_entry_point_name(&self, name: &str) -> bool {
        self.entry_point_names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.duplicates.similarity_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidThreshold(t)) if t == 1.5
        ));

        config.duplicates.similarity_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_min_tokens_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.duplicates.min_body_tokens = 0;
        assert!(matches!(config.validate(), Err(Error::ZeroMinTokens)));
    }

    #[test]
    fn bad_test_pattern_is_rejected() {
        let config = AnalysisConfig {
            test_name_pattern: "(unclosed".to_string(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidTestPattern { .. })
        ));
    }

    #[test]
    fn default_test_pattern_matches_conventions() {
        let re = AnalysisConfig::default().test_name_regex().unwrap();
        assert!(re.is_match("test_parser"));
        assert!(re.is_match("resolve_imports_test"));
        assert!(re.is_match("TestResolver"));
        assert!(!re.is_match("restify"));
        assert!(!re.is_match("handler"));
    }
}
