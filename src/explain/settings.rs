//! Tunables of an explanation run

use serde::{Deserialize, Serialize};

use super::errors::{ExplainError, ExplainResult};

/// Window, ranking and sentiment parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainSettings {
    /// Rows per issuer in the short-term rolling mean (default: 3)
    #[serde(default = "default_short_term_window")]
    pub short_term_window: usize,

    /// Rows per issuer in the long-term rolling mean (default: 10)
    #[serde(default = "default_long_term_window")]
    pub long_term_window: usize,

    /// Contributors listed in each rationale (default: 3)
    #[serde(default = "default_top_features")]
    pub top_features: usize,

    /// News ratio above which a sentiment sentence is added (default: 0.5)
    #[serde(default = "default_sentiment_threshold")]
    pub sentiment_threshold: f64,
}

fn default_short_term_window() -> usize {
    3
}
fn default_long_term_window() -> usize {
    10
}
fn default_top_features() -> usize {
    3
}
fn default_sentiment_threshold() -> f64 {
    0.5
}

impl Default for ExplainSettings {
    fn default() -> Self {
        Self {
            short_term_window: default_short_term_window(),
            long_term_window: default_long_term_window(),
            top_features: default_top_features(),
            sentiment_threshold: default_sentiment_threshold(),
        }
    }
}

impl ExplainSettings {
    pub fn validate(&self) -> ExplainResult<()> {
        if self.short_term_window == 0 || self.long_term_window == 0 {
            return Err(ExplainError::InvalidSettings(
                "trend windows must be at least 1".to_string(),
            ));
        }
        if !self.sentiment_threshold.is_finite() {
            return Err(ExplainError::InvalidSettings(
                "sentiment_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExplainSettings::default();
        assert_eq!(settings.short_term_window, 3);
        assert_eq!(settings.long_term_window, 10);
        assert_eq!(settings.top_features, 3);
        assert_eq!(settings.sentiment_threshold, 0.5);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let settings = ExplainSettings {
            short_term_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ExplainError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ExplainSettings = serde_json::from_str(r#"{"top_features": 5}"#).unwrap();
        assert_eq!(settings.top_features, 5);
        assert_eq!(settings.long_term_window, 10);
    }
}
