use std::{collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{is_valid_product_id, Product},
};

/// Read-only product catalog loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Loads the catalog from a JSON array on disk
    ///
    /// A missing file, malformed JSON, or an invalid or duplicate product ID
    /// is a configuration error.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Product data file not readable at {}: {}",
                path.display(),
                e
            ))
        })?;

        let products: Vec<Product> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!(
                "Product data file at {} is not a valid product list: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_products(products)?;

        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "Loaded product catalog"
        );

        Ok(catalog)
    }

    pub fn from_products(products: Vec<Product>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            if !is_valid_product_id(&product.id) {
                return Err(AppError::Config(format!(
                    "Catalog contains malformed product ID: {}",
                    product.id
                )));
            }
            if product.price < 0.0 {
                return Err(AppError::Config(format!(
                    "Catalog product {} has a negative price",
                    product.id
                )));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(AppError::Config(format!(
                    "Catalog contains duplicate product ID: {}",
                    product.id
                )));
            }
        }

        Ok(Self { products, index })
    }

    /// Every product, in file order
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::product;
    use std::path::PathBuf;
    use tokio_test::assert_err;

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::from_products(vec![
            product("prod001", "Electronics", "SoundWave", 59.99, 4.5),
            product("prod002", "Home", "Acme", 19.99, 3.9),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_id("prod002").unwrap().brand, "Acme");
        assert!(catalog.find_by_id("prod999").is_none());
    }

    #[test]
    fn test_all_preserves_order() {
        let catalog = Catalog::from_products(vec![
            product("prod003", "Home", "Acme", 10.0, 3.0),
            product("prod001", "Home", "Acme", 10.0, 3.0),
            product("prod002", "Home", "Acme", 10.0, 3.0),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prod003", "prod001", "prod002"]);
        let again: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        assert_err!(Catalog::from_products(vec![
            product("prod001", "Home", "Acme", 10.0, 3.0),
            product("prod001", "Home", "Acme", 12.0, 4.0),
        ]));
    }

    #[test]
    fn test_malformed_id_rejected() {
        assert_err!(Catalog::from_products(vec![product(
            "sku-1", "Home", "Acme", 10.0, 3.0
        )]));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert_err!(Catalog::from_products(vec![product(
            "prod001", "Home", "Acme", -1.0, 3.0
        )]));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Catalog::load(Path::new("/definitely/not/here/products.json"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/products.json");
        let catalog = Catalog::load(&path).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.all().iter().all(|p| is_valid_product_id(&p.id)));
    }
}
