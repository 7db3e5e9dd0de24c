//! Test fixtures: products and users loaded from data files.
//!
//! A [`FixtureStore`] is rooted at a data directory and reads product
//! and user records from JSON or CSV. JSON files wrap their records in
//! a named top-level key (`{"products": [...]}`, `{"users": [...]}`);
//! CSV files carry a header row with the field names.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::result::{ComprarError, ComprarResult};

/// Default products fixture file name
pub const DEFAULT_PRODUCTS_JSON: &str = "products.json";

/// Default CSV products fixture file name
pub const DEFAULT_PRODUCTS_CSV: &str = "products.csv";

/// Default users fixture file name
pub const DEFAULT_USERS_JSON: &str = "users.json";

/// A product to order, with its expected catalog price
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product name, used for search and result selection
    #[serde(alias = "Name")]
    pub name: String,
    /// Catalog category
    #[serde(alias = "Category")]
    pub category: String,
    /// Expected unit price
    #[serde(alias = "Price")]
    pub price: f64,
    /// Quantity to order
    #[serde(alias = "Quantity")]
    pub quantity: u32,
}

/// A storefront account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login email
    pub email: String,
    /// Login password
    pub password: String,
    /// Optional first name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Optional last name
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductsFile {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

/// Reads fixture records from a data directory
#[derive(Debug, Clone)]
pub struct FixtureStore {
    data_dir: PathBuf,
}

impl FixtureStore {
    /// Create a store rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory fixture file names are resolved against
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load products from a JSON file (`{"products": [...]}`)
    pub fn products_from_json(&self, file_name: &str) -> ComprarResult<Vec<Product>> {
        let path = self.data_dir.join(file_name);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| fixture_error(&path, &e.to_string()))?;
        let file: ProductsFile = serde_json::from_str(&content)
            .map_err(|e| fixture_error(&path, &e.to_string()))?;
        Ok(file.products)
    }

    /// Load products from a headered CSV file
    pub fn products_from_csv(&self, file_name: &str) -> ComprarResult<Vec<Product>> {
        let path = self.data_dir.join(file_name);
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| fixture_error(&path, &e.to_string()))?;
        let mut products = Vec::new();
        for record in reader.deserialize() {
            let product: Product = record.map_err(|e| fixture_error(&path, &e.to_string()))?;
            products.push(product);
        }
        Ok(products)
    }

    /// Load users from a JSON file (`{"users": [...]}`)
    pub fn users_from_json(&self, file_name: &str) -> ComprarResult<Vec<User>> {
        let path = self.data_dir.join(file_name);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| fixture_error(&path, &e.to_string()))?;
        let file: UsersFile = serde_json::from_str(&content)
            .map_err(|e| fixture_error(&path, &e.to_string()))?;
        Ok(file.users)
    }
}

fn fixture_error(path: &Path, message: &str) -> ComprarError {
    ComprarError::Fixture {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_products_from_json() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            "products.json",
            r#"{
              "products": [
                {"name": "Fiction", "category": "Books", "price": 24.0, "quantity": 2},
                {"name": "Health Book", "category": "Books", "price": 10.0, "quantity": 1}
              ]
            }"#,
        );

        let store = FixtureStore::new(dir.path());
        let products = store.products_from_json("products.json").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Fiction");
        assert_eq!(products[0].price, 24.0);
        assert_eq!(products[1].quantity, 1);
    }

    #[test]
    fn test_products_from_csv() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            "products.csv",
            "name,category,price,quantity\nFiction,Books,24.0,2\nHealth Book,Books,10.0,1\n",
        );

        let store = FixtureStore::new(dir.path());
        let products = store.products_from_csv("products.csv").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "Health Book");
        assert_eq!(products[0].quantity, 2);
    }

    #[test]
    fn test_users_from_json_with_optional_names() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            "users.json",
            r#"{
              "users": [
                {"email": "a@shop.test", "password": "pw", "firstName": "Ana", "lastName": "Lopez"},
                {"email": "b@shop.test", "password": "pw"}
              ]
            }"#,
        );

        let store = FixtureStore::new(dir.path());
        let users = store.users_from_json("users.json").unwrap();
        assert_eq!(users[0].first_name.as_deref(), Some("Ana"));
        assert_eq!(users[1].first_name, None);
    }

    #[test]
    fn test_missing_file_is_fixture_error() {
        let dir = TempDir::new().unwrap();
        let store = FixtureStore::new(dir.path());
        let err = store.products_from_json("absent.json").unwrap_err();
        assert!(matches!(err, ComprarError::Fixture { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_malformed_json_is_fixture_error() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir, "products.json", "{\"products\": [{]}");
        let store = FixtureStore::new(dir.path());
        assert!(store.products_from_json("products.json").is_err());
    }
}
