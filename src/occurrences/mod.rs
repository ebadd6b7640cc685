//! Occurrence operations

mod types;

use crate::error::Error;
use crate::fetch::ApiClient;

pub use types::*;

/// Client for `/ocorrencias`
#[derive(Clone)]
pub struct OccurrencesClient {
    api: ApiClient,
}

impl OccurrencesClient {
    /// Create a new OccurrencesClient
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List occurrences visible to the session
    pub async fn list(&self) -> Result<Vec<Occurrence>, Error> {
        self.api.get("ocorrencias").execute().await
    }

    /// Submit a new occurrence
    pub async fn create(&self, occurrence: &NewOccurrence) -> Result<Occurrence, Error> {
        self.api.post("ocorrencias").json(occurrence)?.execute().await
    }

    /// Get an occurrence by ID
    pub async fn get(&self, id: i64) -> Result<Occurrence, Error> {
        self.api.get(&format!("ocorrencias/{id}")).execute().await
    }

    /// Edit the subject or details of an occurrence
    pub async fn update(&self, id: i64, update: &OccurrenceUpdate) -> Result<Occurrence, Error> {
        self.api
            .put(&format!("ocorrencias/{id}"))
            .json(update)?
            .execute()
            .await
    }

    /// Delete an occurrence
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("ocorrencias/{id}"))
            .execute_empty()
            .await
    }

    /// List the occurrences submitted by a user
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Occurrence>, Error> {
        self.api
            .get(&format!("usuarios/{user_id}/ocorrencias"))
            .execute()
            .await
    }

    /// Search occurrences by protocol, kind, status or sector
    pub async fn search(&self, search: &OccurrenceSearch) -> Result<Vec<Occurrence>, Error> {
        self.api
            .get("ocorrencias/search")
            .query(&search.to_query())
            .execute()
            .await
    }

    /// List every occurrence regardless of owner
    pub async fn all(&self) -> Result<Vec<Occurrence>, Error> {
        self.api.get("ocorrencias/all").execute().await
    }

    /// Record how satisfied the user is with the handling of an occurrence
    pub async fn save_satisfaction(&self, rating: &SatisfactionRating) -> Result<(), Error> {
        let rating = SatisfactionRating::new(rating.occurrence_id, rating.score)?;
        self.api
            .post("ocorrencias/salvar_satisfacao_do_usuario")
            .json(&rating)?
            .execute_empty()
            .await
    }

    /// Answers posted by the administration
    pub async fn replies(&self, id: i64) -> Result<Vec<OccurrenceReply>, Error> {
        self.api
            .get(&format!("ocorrencias/{id}/respostas_ocorrencia"))
            .execute()
            .await
    }
}
