//! Cached reads and invalidating writes over the domain services

use std::sync::Arc;

use crate::auth::Auth;
use crate::categories::{CategoriesClient, Category, CategoryInput};
use crate::complaints::{Complaint, ComplaintUpdate, ComplaintsClient, NewComplaint};
use crate::error::Error;
use crate::occurrences::{
    NewOccurrence, Occurrence, OccurrenceReply, OccurrenceSearch, OccurrenceUpdate,
    OccurrencesClient, SatisfactionRating,
};
use crate::query::{QueryClient, QueryKey};
use crate::users::{UserProfile, UserUpdate, UsersClient};

const CATEGORIES: &str = "categorias";
const COMPLAINTS: &str = "reclamacoes";
const OCCURRENCES: &str = "ocorrencias";
const USERS: &str = "usuarios";

/// Query keys used by [`Queries`]
pub mod keys {
    use super::*;

    pub fn categories() -> QueryKey {
        QueryKey::root(CATEGORIES)
    }

    pub fn category(id: i64) -> QueryKey {
        categories().push(id)
    }

    pub fn complaints() -> QueryKey {
        QueryKey::root(COMPLAINTS)
    }

    pub fn complaint(id: i64) -> QueryKey {
        complaints().push(id)
    }

    pub fn user_complaints(user_id: i64) -> QueryKey {
        complaints().push("usuario").push(user_id)
    }

    pub fn occurrences() -> QueryKey {
        QueryKey::root(OCCURRENCES)
    }

    pub fn occurrence(id: i64) -> QueryKey {
        occurrences().push(id)
    }

    pub fn user_occurrences(user_id: i64) -> QueryKey {
        occurrences().push("usuario").push(user_id)
    }

    pub fn all_occurrences() -> QueryKey {
        occurrences().push("all")
    }

    pub fn occurrence_search(search: &OccurrenceSearch) -> QueryKey {
        search
            .to_query()
            .into_iter()
            .fold(occurrences().push("search"), |key, (name, value)| {
                key.push(format!("{name}={value}"))
            })
    }

    pub fn occurrence_replies(id: i64) -> QueryKey {
        occurrence(id).push("respostas")
    }

    pub fn user(id: i64) -> QueryKey {
        QueryKey::root(USERS).push(id)
    }
}

/// Domain services wrapped in the query cache policy
///
/// Reads are served from the cache while fresh. Writes invalidate the keys of
/// every read they can affect.
#[derive(Clone)]
pub struct Queries {
    cache: QueryClient,
    auth: Arc<Auth>,
    users: UsersClient,
    complaints: ComplaintsClient,
    occurrences: OccurrencesClient,
    categories: CategoriesClient,
}

impl Queries {
    pub(crate) fn new(
        cache: QueryClient,
        auth: Arc<Auth>,
        users: UsersClient,
        complaints: ComplaintsClient,
        occurrences: OccurrencesClient,
        categories: CategoriesClient,
    ) -> Self {
        Self {
            cache,
            auth,
            users,
            complaints,
            occurrences,
            categories,
        }
    }

    // Categories

    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.cache
            .fetch(keys::categories(), || self.categories.list())
            .await
    }

    pub async fn category(&self, id: i64) -> Result<Category, Error> {
        self.cache
            .fetch(keys::category(id), || self.categories.get(id))
            .await
    }

    pub async fn create_category(&self, category: &CategoryInput) -> Result<Category, Error> {
        self.cache
            .mutate(&[keys::categories()], self.categories.create(category))
            .await
    }

    pub async fn update_category(
        &self,
        id: i64,
        category: &CategoryInput,
    ) -> Result<Category, Error> {
        self.cache
            .mutate(&[keys::categories()], self.categories.update(id, category))
            .await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), Error> {
        self.cache
            .mutate(&[keys::categories()], self.categories.delete(id))
            .await
    }

    // Complaints

    pub async fn complaints(&self) -> Result<Vec<Complaint>, Error> {
        self.cache
            .fetch(keys::complaints(), || self.complaints.list())
            .await
    }

    pub async fn complaint(&self, id: i64) -> Result<Complaint, Error> {
        self.cache
            .fetch(keys::complaint(id), || self.complaints.get(id))
            .await
    }

    pub async fn user_complaints(&self, user_id: i64) -> Result<Vec<Complaint>, Error> {
        self.cache
            .fetch(keys::user_complaints(user_id), || {
                self.complaints.list_by_user(user_id)
            })
            .await
    }

    pub async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint, Error> {
        self.cache
            .mutate(&[keys::complaints()], self.complaints.create(complaint))
            .await
    }

    pub async fn update_complaint(
        &self,
        id: i64,
        update: &ComplaintUpdate,
    ) -> Result<Complaint, Error> {
        self.cache
            .mutate(&[keys::complaints()], self.complaints.update(id, update))
            .await
    }

    pub async fn delete_complaint(&self, id: i64) -> Result<(), Error> {
        self.cache
            .mutate(&[keys::complaints()], self.complaints.delete(id))
            .await
    }

    // Occurrences

    pub async fn occurrences(&self) -> Result<Vec<Occurrence>, Error> {
        self.cache
            .fetch(keys::occurrences(), || self.occurrences.list())
            .await
    }

    pub async fn occurrence(&self, id: i64) -> Result<Occurrence, Error> {
        self.cache
            .fetch(keys::occurrence(id), || self.occurrences.get(id))
            .await
    }

    pub async fn user_occurrences(&self, user_id: i64) -> Result<Vec<Occurrence>, Error> {
        self.cache
            .fetch(keys::user_occurrences(user_id), || {
                self.occurrences.list_by_user(user_id)
            })
            .await
    }

    pub async fn all_occurrences(&self) -> Result<Vec<Occurrence>, Error> {
        self.cache
            .fetch(keys::all_occurrences(), || self.occurrences.all())
            .await
    }

    pub async fn search_occurrences(
        &self,
        search: &OccurrenceSearch,
    ) -> Result<Vec<Occurrence>, Error> {
        self.cache
            .fetch(keys::occurrence_search(search), || {
                self.occurrences.search(search)
            })
            .await
    }

    pub async fn occurrence_replies(&self, id: i64) -> Result<Vec<OccurrenceReply>, Error> {
        self.cache
            .fetch(keys::occurrence_replies(id), || self.occurrences.replies(id))
            .await
    }

    pub async fn create_occurrence(
        &self,
        occurrence: &NewOccurrence,
    ) -> Result<Occurrence, Error> {
        self.cache
            .mutate(&[keys::occurrences()], self.occurrences.create(occurrence))
            .await
    }

    pub async fn update_occurrence(
        &self,
        id: i64,
        update: &OccurrenceUpdate,
    ) -> Result<Occurrence, Error> {
        self.cache
            .mutate(&[keys::occurrences()], self.occurrences.update(id, update))
            .await
    }

    pub async fn delete_occurrence(&self, id: i64) -> Result<(), Error> {
        self.cache
            .mutate(&[keys::occurrences()], self.occurrences.delete(id))
            .await
    }

    pub async fn save_satisfaction(&self, rating: &SatisfactionRating) -> Result<(), Error> {
        self.cache
            .mutate(
                &[keys::occurrences()],
                self.occurrences.save_satisfaction(rating),
            )
            .await
    }

    // Users

    pub async fn user(&self, id: i64) -> Result<UserProfile, Error> {
        self.cache
            .fetch(keys::user(id), || self.users.get(id))
            .await
    }

    /// Update a profile, refreshing the session copy when it is the signed-in user
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<UserProfile, Error> {
        let user = self
            .cache
            .mutate(&[keys::user(id)], self.users.update(id, update))
            .await?;

        if self.auth.current_user().map(|u| u.id) == Some(user.id) {
            self.auth.replace_user(user.clone()).await?;
        }
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        self.cache
            .mutate(&[keys::user(id)], self.users.delete(id))
            .await
    }
}
