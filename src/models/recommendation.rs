use serde::{Deserialize, Serialize};

use super::Product;

/// Upper bound on recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Upper bound on explanation length, in characters
pub const MAX_EXPLANATION_CHARS: usize = 500;

/// Explanation used when the model gives none
pub const DEFAULT_EXPLANATION: &str = "This product matches your preferences.";

/// Confidence in a recommendation, always within 1..=10
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const NEUTRAL: ConfidenceScore = ConfidenceScore(5);

    /// Clamps an arbitrary integer into range
    pub fn new(raw: i64) -> Self {
        Self(raw.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A single recommended product with its explanation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationItem {
    pub product: Product,
    pub explanation: String,
    pub confidence_score: ConfidenceScore,
}

impl RecommendationItem {
    /// Blank explanations are replaced and long ones truncated on a char boundary
    pub fn new(product: Product, explanation: &str, confidence_score: ConfidenceScore) -> Self {
        let trimmed = explanation.trim();
        let explanation = if trimmed.is_empty() {
            DEFAULT_EXPLANATION.to_string()
        } else {
            trimmed.chars().take(MAX_EXPLANATION_CHARS).collect()
        };

        Self {
            product,
            explanation,
            confidence_score,
        }
    }
}

/// Recommendations returned to the client
///
/// `count` is derived from the list when the value is built, so it cannot
/// drift from `recommendations.len()`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResult {
    recommendations: Vec<RecommendationItem>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl RecommendationResult {
    pub fn new(mut recommendations: Vec<RecommendationItem>, error: Option<String>) -> Self {
        recommendations.truncate(MAX_RECOMMENDATIONS);
        Self {
            count: recommendations.len(),
            recommendations,
            error,
        }
    }

    /// An empty result carrying only an error annotation
    pub fn failed(error: impl Into<String>) -> Self {
        Self::new(Vec::new(), Some(error.into()))
    }

    pub fn recommendations(&self) -> &[RecommendationItem] {
        &self.recommendations
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some() && !self.recommendations.is_empty()
    }
}
