//! Complaint operations

mod types;

use crate::error::Error;
use crate::fetch::ApiClient;

pub use types::*;

/// Client for `/reclamacoes`
#[derive(Clone)]
pub struct ComplaintsClient {
    api: ApiClient,
}

impl ComplaintsClient {
    /// Create a new ComplaintsClient
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every complaint visible to the session
    pub async fn list(&self) -> Result<Vec<Complaint>, Error> {
        self.api.get("reclamacoes").execute().await
    }

    /// Submit a new complaint
    pub async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, Error> {
        self.api.post("reclamacoes").json(complaint)?.execute().await
    }

    /// Get a complaint by ID
    pub async fn get(&self, id: i64) -> Result<Complaint, Error> {
        self.api.get(&format!("reclamacoes/{id}")).execute().await
    }

    /// Update a complaint
    pub async fn update(&self, id: i64, update: &ComplaintUpdate) -> Result<Complaint, Error> {
        self.api
            .put(&format!("reclamacoes/{id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Delete a complaint
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("reclamacoes/{id}"))
            .execute_empty()
            .await
    }

    /// List the complaints submitted by a user
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Complaint>, Error> {
        self.api
            .get(&format!("usuarios/{user_id}/reclamacoes"))
            .execute()
            .await
    }
}
