//! User account operations

mod types;

use crate::error::Error;
use crate::fetch::ApiClient;

pub use types::*;

/// Client for `/usuarios`
#[derive(Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    /// Create a new UsersClient
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Register a new account
    pub async fn register(&self, user: &NewUser) -> Result<UserProfile, Error> {
        self.api.post("usuarios").json(user)?.execute().await
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<UserProfile, Error> {
        self.api.get(&format!("usuarios/{id}")).execute().await
    }

    /// Update a user's profile
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<UserProfile, Error> {
        self.api
            .put(&format!("usuarios/{id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Delete a user
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.api.delete(&format!("usuarios/{id}")).execute_empty().await
    }
}
