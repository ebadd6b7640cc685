//! Complaint categories (reference data)

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::ApiClient;

/// A complaint category and the sector that handles it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "setor")]
    pub sector: String,
}

/// Payload for creating or replacing a category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "setor")]
    pub sector: String,
}

/// Client for `/categorias`
#[derive(Clone)]
pub struct CategoriesClient {
    api: ApiClient,
}

impl CategoriesClient {
    /// Create a new CategoriesClient
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        self.api.get("categorias").execute().await
    }

    /// Create a category
    pub async fn create(&self, category: &CategoryInput) -> Result<Category, Error> {
        self.api.post("categorias").json(category)?.execute().await
    }

    /// Get a category by ID
    pub async fn get(&self, id: i64) -> Result<Category, Error> {
        self.api.get(&format!("categorias/{id}")).execute().await
    }

    /// Replace a category
    pub async fn update(&self, id: i64, category: &CategoryInput) -> Result<Category, Error> {
        self.api
            .put(&format!("categorias/{id}"))
            .json(category)?
            .execute()
            .await
    }

    /// Delete a category
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("categorias/{id}"))
            .execute_empty()
            .await
    }
}
