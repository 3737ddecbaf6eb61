use crate::models::{Product, UserPreferences};

/// Category filtering is skipped when it would leave fewer candidates than this.
///
/// Tunable; keeps small catalogs from being narrowed to a handful of items.
pub const CATEGORY_FILTER_MIN_CANDIDATES: usize = 10;

/// Narrows the catalog to candidates relevant to the stated preferences
///
/// 1. Keep products inside the chosen price bracket
/// 2. Keep preferred categories, unless fewer than
///    [`CATEGORY_FILTER_MIN_CANDIDATES`] would remain
/// 3. Move preferred brands to the front without dropping anything
///
/// The output order decides which candidates survive prompt truncation.
pub fn filter_products<'a>(
    products: &'a [Product],
    preferences: &UserPreferences,
) -> Vec<&'a Product> {
    let mut filtered: Vec<&Product> = products
        .iter()
        .filter(|p| preferences.price_range.contains(p.price))
        .collect();

    if !preferences.categories.is_empty() {
        let by_category: Vec<&Product> = filtered
            .iter()
            .copied()
            .filter(|p| preferences.prefers_category(&p.category))
            .collect();

        if by_category.len() >= CATEGORY_FILTER_MIN_CANDIDATES {
            filtered = by_category;
        } else {
            tracing::debug!(
                matches = by_category.len(),
                threshold = CATEGORY_FILTER_MIN_CANDIDATES,
                "Skipping category filter"
            );
        }
    }

    if !preferences.brands.is_empty() {
        // sort_by_key is stable
        filtered.sort_by_key(|p| !preferences.prefers_brand(&p.brand));
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures::product, PriceRange};

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn catalog_with_category_count(matching: usize, other: usize) -> Vec<Product> {
        let mut products = Vec::new();
        for i in 0..matching {
            products.push(product(&format!("prod{:03}", i), "Electronics", "Acme", 20.0, 4.0));
        }
        for i in 0..other {
            products.push(product(&format!("prod{:03}", 100 + i), "Home", "Acme", 20.0, 4.0));
        }
        products
    }

    #[test]
    fn test_price_brackets() {
        let products = vec![
            product("prod001", "Home", "Acme", 10.0, 4.0),
            product("prod002", "Home", "Acme", 50.0, 4.0),
            product("prod003", "Home", "Acme", 75.0, 4.0),
            product("prod004", "Home", "Acme", 100.0, 4.0),
            product("prod005", "Home", "Acme", 150.0, 4.0),
        ];

        let cases = [
            (PriceRange::Under50, vec!["prod001", "prod002"]),
            (PriceRange::From50To100, vec!["prod003", "prod004"]),
            (PriceRange::Over100, vec!["prod005"]),
            (
                PriceRange::All,
                vec!["prod001", "prod002", "prod003", "prod004", "prod005"],
            ),
        ];

        for (price_range, expected) in cases {
            let prefs = UserPreferences {
                price_range,
                ..Default::default()
            };
            assert_eq!(ids(&filter_products(&products, &prefs)), expected, "{}", price_range);
        }
    }

    #[test]
    fn test_category_filter_applied_at_threshold() {
        let products = catalog_with_category_count(10, 5);
        let prefs = UserPreferences {
            categories: vec!["Electronics".to_string()],
            ..Default::default()
        };

        let filtered = filter_products(&products, &prefs);
        assert_eq!(filtered.len(), 10);
        assert!(filtered.iter().all(|p| p.category == "Electronics"));
    }

    #[test]
    fn test_category_filter_skipped_below_threshold() {
        let products = catalog_with_category_count(9, 5);
        let prefs = UserPreferences {
            categories: vec!["Electronics".to_string()],
            ..Default::default()
        };

        let filtered = filter_products(&products, &prefs);
        assert_eq!(filtered.len(), 14);
    }

    #[test]
    fn test_brand_reordering_is_stable() {
        let products = vec![
            product("prod001", "Home", "Acme", 20.0, 4.0),
            product("prod002", "Home", "SoundWave", 20.0, 4.0),
            product("prod003", "Home", "Acme", 20.0, 4.0),
            product("prod004", "Home", "Zenith", 20.0, 4.0),
            product("prod005", "Home", "SoundWave", 20.0, 4.0),
        ];
        let prefs = UserPreferences {
            brands: vec!["SoundWave".to_string(), "Zenith".to_string()],
            ..Default::default()
        };

        let filtered = filter_products(&products, &prefs);
        assert_eq!(
            ids(&filtered),
            vec!["prod002", "prod004", "prod005", "prod001", "prod003"]
        );
    }

    #[test]
    fn test_never_grows_or_mutates_input() {
        let products = catalog_with_category_count(12, 12);
        let snapshot = products.clone();

        let preference_sets = [
            UserPreferences::default(),
            UserPreferences {
                price_range: PriceRange::Under50,
                categories: vec!["Home".to_string()],
                brands: vec!["Acme".to_string()],
            },
            UserPreferences {
                price_range: PriceRange::Over100,
                categories: vec!["Nope".to_string()],
                brands: Vec::new(),
            },
        ];

        for prefs in &preference_sets {
            assert!(filter_products(&products, prefs).len() <= products.len());
        }
        assert_eq!(products, snapshot);
    }
}
