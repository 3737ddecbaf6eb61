use serde::{Deserialize, Serialize};

mod recommendation;
mod user_preferences;

pub use recommendation::{
    ConfidenceScore, RecommendationItem, RecommendationResult, DEFAULT_EXPLANATION,
    MAX_EXPLANATION_CHARS, MAX_RECOMMENDATIONS,
};
pub use user_preferences::{
    BrowsingHistory, PriceRange, RecommendationRequest, UserPreferences, MAX_BROWSING_HISTORY,
    MAX_PREFERRED_BRANDS,
};

/// Prefix shared by every catalog product identifier
pub const PRODUCT_ID_PREFIX: &str = "prod";

/// Returns true for identifiers of the form `prod` followed by one or more ASCII digits
pub fn is_valid_product_id(id: &str) -> bool {
    match id.strip_prefix(PRODUCT_ID_PREFIX) {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// A purchasable product from the static catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub price: f64,
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}
