use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Display};

use super::is_valid_product_id;
use crate::error::{AppError, AppResult};

/// Maximum number of preferred brands accepted per request
pub const MAX_PREFERRED_BRANDS: usize = 10;

/// Maximum number of browsing history entries accepted per request
pub const MAX_BROWSING_HISTORY: usize = 20;

/// Price bracket selected by the shopper
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PriceRange {
    #[serde(rename = "0-50")]
    Under50,
    #[serde(rename = "50-100")]
    From50To100,
    #[serde(rename = "100+")]
    Over100,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl PriceRange {
    /// Whether a price falls inside this bracket
    ///
    /// Brackets are `[0, 50]`, `(50, 100]` and `(100, ∞)`.
    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceRange::Under50 => price <= 50.0,
            PriceRange::From50To100 => price > 50.0 && price <= 100.0,
            PriceRange::Over100 => price > 100.0,
            PriceRange::All => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Under50 => "0-50",
            PriceRange::From50To100 => "50-100",
            PriceRange::Over100 => "100+",
            PriceRange::All => "all",
        }
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shopping preferences stated for a single request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserPreferences {
    #[serde(rename = "priceRange", default)]
    pub price_range: PriceRange,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
}

impl UserPreferences {
    pub fn validate(&self) -> AppResult<()> {
        if self.brands.len() > MAX_PREFERRED_BRANDS {
            return Err(AppError::Validation(format!(
                "Maximum {} brands are allowed",
                MAX_PREFERRED_BRANDS
            )));
        }
        Ok(())
    }

    pub fn prefers_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn prefers_brand(&self, brand: &str) -> bool {
        self.brands.iter().any(|b| b == brand)
    }
}

/// Product identifiers viewed by the shopper, validated and deduplicated
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowsingHistory(Vec<String>);

impl BrowsingHistory {
    /// Validates every identifier and drops repeats, keeping first occurrences
    pub fn parse(ids: Vec<String>) -> AppResult<Self> {
        if ids.len() > MAX_BROWSING_HISTORY {
            return Err(AppError::Validation(format!(
                "Browsing history is limited to {} entries",
                MAX_BROWSING_HISTORY
            )));
        }

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(ids.len());

        for id in ids {
            if !is_valid_product_id(&id) {
                return Err(AppError::Validation(format!(
                    "Invalid product ID format: {}. Expected format: prodXXX",
                    id
                )));
            }
            if seen.insert(id.clone()) {
                unique.push(id);
            }
        }

        Ok(Self(unique))
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Body of `POST /api/recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub browsing_history: Vec<String>,
}

impl RecommendationRequest {
    /// Checks brand and history limits, returning the validated parts
    pub fn validate(self) -> AppResult<(UserPreferences, BrowsingHistory)> {
        self.preferences.validate()?;
        let history = BrowsingHistory::parse(self.browsing_history)?;
        Ok((self.preferences, history))
    }
}
