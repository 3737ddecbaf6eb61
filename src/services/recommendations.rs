use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{BrowsingHistory, Product, RecommendationResult, UserPreferences},
    services::{
        catalog::Catalog,
        filter::filter_products,
        parser::parse_recommendations,
        prompt::{build_prompt, SYSTEM_PROMPT},
        providers::ModelClient,
    },
};

/// Generates personalized product recommendations
///
/// Filters the catalog by the stated preferences, builds a prompt from the
/// filtered candidates and the browsed products, asks the model, and parses
/// its reply against the catalog. Only a failed model call is an error;
/// unusable model output degrades to the top-rated fallback.
pub async fn get_recommendations(
    catalog: &Catalog,
    model: &dyn ModelClient,
    preferences: &UserPreferences,
    history: &BrowsingHistory,
) -> AppResult<RecommendationResult> {
    let start = Instant::now();

    let browsed: Vec<&Product> = history
        .ids()
        .iter()
        .filter_map(|id| {
            let product = catalog.find_by_id(id);
            if product.is_none() {
                tracing::debug!(product_id = %id, "Browsed product not in catalog");
            }
            product
        })
        .collect();

    let candidates = filter_products(catalog.all(), preferences);

    tracing::info!(
        price_range = %preferences.price_range,
        categories = preferences.categories.len(),
        brands = preferences.brands.len(),
        browsed = browsed.len(),
        candidate_count = candidates.len(),
        "Building recommendation prompt"
    );

    let prompt = build_prompt(preferences, &browsed, &candidates);

    let raw = model
        .complete(SYSTEM_PROMPT, &prompt)
        .await
        .map_err(|e| {
            tracing::error!(provider = model.name(), error = %e, "Model call failed");
            AppError::ExternalApi(format!("Failed to generate recommendations: {}", e))
        })?;

    let result = parse_recommendations(&raw, catalog.all());

    tracing::info!(
        count = result.count(),
        fallback = result.error().is_some(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Recommendations generated"
    );

    Ok(result)
}

/// The full catalog, unfiltered
pub fn list_products(catalog: &Catalog) -> &[Product] {
    catalog.all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures::product, PriceRange};
    use crate::services::parser::PARSE_FALLBACK_ERROR;
    use crate::services::providers::MockModelClient;

    fn catalog() -> Catalog {
        let mut products = Vec::new();
        for i in 1..=30 {
            let (category, brand) = if i % 2 == 0 {
                ("Electronics", "SoundWave")
            } else {
                ("Home", "Acme")
            };
            products.push(product(
                &format!("prod{:03}", i),
                category,
                brand,
                40.0 + i as f64 * 2.0,
                3.0 + (i % 5) as f64 * 0.4,
            ));
        }
        Catalog::from_products(products).unwrap()
    }

    fn history(ids: &[&str]) -> BrowsingHistory {
        BrowsingHistory::parse(ids.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_returns_model_picks() {
        let mut model = MockModelClient::new();
        model
            .expect_complete()
            .times(1)
            .returning(|system, prompt| {
                assert_eq!(system, SYSTEM_PROMPT);
                assert!(prompt.contains("Price range: 50-100"));
                assert!(prompt.contains("BROWSING HISTORY (recently viewed products)"));
                Ok(r#"[
                    {"product_id": "prod010", "explanation": "Crisp audio.", "score": 9},
                    {"product_id": "prod012", "explanation": "Long battery.", "score": 8}
                ]"#
                .to_string())
            });
        model.expect_name().return_const("mock");

        let prefs = UserPreferences {
            price_range: PriceRange::From50To100,
            categories: vec!["Electronics".to_string()],
            brands: vec!["SoundWave".to_string()],
        };

        let result =
            get_recommendations(&catalog(), &model, &prefs, &history(&["prod002", "prod004"]))
                .await
                .unwrap();

        let ids: Vec<&str> = result
            .recommendations()
            .iter()
            .map(|r| r.product.id.as_str())
            .collect();
        assert_eq!(ids, vec!["prod010", "prod012"]);
        assert!(result.error().is_none());
    }

    #[tokio::test]
    async fn test_unknown_history_ids_are_skipped() {
        let mut model = MockModelClient::new();
        model.expect_complete().times(1).returning(|_, prompt| {
            assert!(prompt.contains("No previous browsing history"));
            Ok("[]".to_string())
        });
        model.expect_name().return_const("mock");

        let result = get_recommendations(
            &catalog(),
            &model,
            &UserPreferences::default(),
            &history(&["prod999"]),
        )
        .await
        .unwrap();

        assert_eq!(result.count(), 5);
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn test_garbage_model_output_falls_back() {
        let mut model = MockModelClient::new();
        model
            .expect_complete()
            .returning(|_, _| Ok("Sorry, I can't do that".to_string()));
        model.expect_name().return_const("mock");

        let result = get_recommendations(
            &catalog(),
            &model,
            &UserPreferences::default(),
            &BrowsingHistory::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.count(), 5);
        assert_eq!(result.error(), Some(PARSE_FALLBACK_ERROR));
    }

    #[tokio::test]
    async fn test_model_failure_is_an_error() {
        let mut model = MockModelClient::new();
        model
            .expect_complete()
            .returning(|_, _| Err(AppError::ExternalApi("connection refused".to_string())));
        model.expect_name().return_const("mock");

        let err = get_recommendations(
            &catalog(),
            &model,
            &UserPreferences::default(),
            &BrowsingHistory::default(),
        )
        .await
        .unwrap_err();

        match err {
            AppError::ExternalApi(msg) => {
                assert!(msg.starts_with("Failed to generate recommendations"));
                assert!(msg.contains("connection refused"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_list_products_returns_full_catalog() {
        let catalog = catalog();
        assert_eq!(list_products(&catalog).len(), 30);
    }
}
