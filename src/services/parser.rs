use serde_json::Value;
use std::collections::HashSet;

use crate::models::{
    ConfidenceScore, Product, RecommendationItem, RecommendationResult, MAX_RECOMMENDATIONS,
};

/// Annotation attached when the model text could not be parsed as JSON
pub const PARSE_FALLBACK_ERROR: &str = "Used fallback recommendations due to parsing error";

/// Annotation attached when the model named no usable catalog products
pub const EMPTY_FALLBACK_ERROR: &str =
    "Used fallback recommendations: model response contained no usable catalog products";

/// Characters of raw model output included in warning logs
const LOG_PREVIEW_CHARS: usize = 500;

/// Why a model response could not be used as-is
#[derive(Debug, thiserror::Error)]
enum ParseError {
    /// Not JSON at all; recovered with the rating fallback
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON of an unexpected shape
    #[error("{0}")]
    Shape(String),
}

/// Turns raw model text into validated recommendations
///
/// Model output is untrusted: every field is defaulted, unknown products are
/// dropped, duplicates keep their first occurrence, and this never fails.
/// Unparseable or empty output falls back to the top-rated catalog products.
pub fn parse_recommendations(raw: &str, products: &[Product]) -> RecommendationResult {
    match extract_items(raw, products) {
        Ok(items) if !items.is_empty() => {
            tracing::debug!(accepted = items.len(), "Parsed model recommendations");
            RecommendationResult::new(items, None)
        }
        Ok(_) => {
            tracing::warn!(
                response = %preview(raw),
                "Model response contained no usable products, using fallback"
            );
            fallback(products, EMPTY_FALLBACK_ERROR)
        }
        Err(ParseError::Json(e)) => {
            tracing::warn!(
                error = %e,
                response = %preview(raw),
                "Failed to parse model response, using fallback"
            );
            fallback(products, PARSE_FALLBACK_ERROR)
        }
        Err(e @ ParseError::Shape(_)) => {
            tracing::error!(
                error = %e,
                response = %preview(raw),
                "Unexpected model response shape"
            );
            RecommendationResult::failed(format!("Failed to parse recommendations: {}", e))
        }
    }
}

fn extract_items(raw: &str, products: &[Product]) -> Result<Vec<RecommendationItem>, ParseError> {
    let cleaned = strip_code_fences(raw);
    let value = parse_json(&cleaned)?;

    let entries = value.as_array().ok_or_else(|| {
        ParseError::Shape(format!("expected a JSON array, got {}", json_kind(&value)))
    })?;

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(MAX_RECOMMENDATIONS);

    for entry in entries {
        if items.len() == MAX_RECOMMENDATIONS {
            break;
        }

        let fields = entry.as_object().ok_or_else(|| {
            ParseError::Shape(format!(
                "expected recommendation objects, got {}",
                json_kind(entry)
            ))
        })?;

        let Some(product_id) = fields.get("product_id").and_then(Value::as_str) else {
            continue;
        };
        if seen.contains(product_id) {
            continue;
        }
        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            tracing::debug!(product_id = %product_id, "Dropping unknown product from model output");
            continue;
        };

        seen.insert(product_id.to_string());

        let explanation = fields
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let score = fields
            .get("score")
            .and_then(coerce_score)
            .unwrap_or(ConfidenceScore::NEUTRAL);

        items.push(RecommendationItem::new(product.clone(), explanation, score));
    }

    Ok(items)
}

/// Removes markdown code fences (```json and bare ```) and surrounding whitespace
fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parses the whole text, then retries on the outermost `[...]` span
fn parse_json(cleaned: &str) -> Result<Value, ParseError> {
    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(e) => {
            let span = cleaned
                .find('[')
                .zip(cleaned.rfind(']'))
                .filter(|(start, end)| start < end)
                .map(|(start, end)| &cleaned[start..=end]);

            match span {
                Some(array) => serde_json::from_str(array).map_err(|_| ParseError::Json(e)),
                None => Err(ParseError::Json(e)),
            }
        }
    }
}

/// Integers, floats (truncated) and numeric strings become scores
fn coerce_score(value: &Value) -> Option<ConfidenceScore> {
    let raw = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }?;

    Some(ConfidenceScore::new(raw))
}

/// Top-rated products (stable by catalog order on ties) with generic explanations
fn fallback(products: &[Product], error: &str) -> RecommendationResult {
    let mut ranked: Vec<&Product> = products.iter().collect();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let items = ranked
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|product| {
            let explanation = format!(
                "This highly-rated {} product is popular with shoppers.",
                product.category.to_lowercase()
            );
            RecommendationItem::new(product.clone(), &explanation, ConfidenceScore::NEUTRAL)
        })
        .collect();

    RecommendationResult::new(items, Some(error.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn preview(raw: &str) -> String {
    raw.chars().take(LOG_PREVIEW_CHARS).collect()
}
