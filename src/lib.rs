//! Ouvidoria Móvel client library
//!
//! Client core for the citizen ombudsman API: sign-in and session persistence,
//! typed access to complaints, occurrences, categories and user accounts, and a
//! cache-aware query layer for the UI.

pub mod auth;
pub mod categories;
pub mod complaints;
pub mod config;
pub mod error;
pub mod fetch;
pub mod occurrences;
pub mod query;
pub mod status;
pub mod storage;
pub mod users;

use std::sync::Arc;

use crate::auth::{Auth, SessionStore};
use crate::categories::CategoriesClient;
use crate::complaints::ComplaintsClient;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{ApiClient, LoggingInterceptor, ResponseInterceptor};
use crate::occurrences::OccurrencesClient;
use crate::query::{Queries, QueryClient};
use crate::storage::KeyValueStorage;
use crate::users::UsersClient;

/// The main entry point for the Ouvidoria client
pub struct Ouvidoria {
    api: ApiClient,
    auth: Arc<Auth>,
    query: QueryClient,
    options: ClientOptions,
}

impl Ouvidoria {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `api_url` - The base URL of the Ouvidoria API
    /// * `storage` - Where the session is persisted between runs
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ouvidoria_client::{storage::MemoryStorage, Ouvidoria};
    ///
    /// let ouvidoria = Ouvidoria::new("https://ouvidoria.example.gov.br/api", Arc::new(MemoryStorage::new())).unwrap();
    /// ```
    pub fn new(api_url: &str, storage: Arc<dyn KeyValueStorage>) -> Result<Self, Error> {
        Self::new_with_options(api_url, storage, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use ouvidoria_client::{config::ClientOptions, storage::MemoryStorage, Ouvidoria};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Some(Duration::from_secs(10)));
    /// let ouvidoria = Ouvidoria::new_with_options(
    ///     "https://ouvidoria.example.gov.br/api",
    ///     Arc::new(MemoryStorage::new()),
    ///     options,
    /// )
    /// .unwrap();
    /// ```
    pub fn new_with_options(
        api_url: &str,
        storage: Arc<dyn KeyValueStorage>,
        options: ClientOptions,
    ) -> Result<Self, Error> {
        Self::new_with_interceptor(api_url, storage, options, Arc::new(LoggingInterceptor))
    }

    /// Create a new client with a custom handler for 401/403 responses
    pub fn new_with_interceptor(
        api_url: &str,
        storage: Arc<dyn KeyValueStorage>,
        options: ClientOptions,
        interceptor: Arc<dyn ResponseInterceptor>,
    ) -> Result<Self, Error> {
        let api = ApiClient::with_interceptor(api_url, &options, interceptor)?;
        let query = QueryClient::new(&options);
        let store = SessionStore::new(storage, &options.session_key);
        let auth = Arc::new(Auth::new(api.clone(), store, query.clone()));

        Ok(Self {
            api,
            auth,
            query,
            options,
        })
    }

    /// Create a client from `OUVIDORIA_API_URL` and the other `OUVIDORIA_*` variables
    pub fn from_env(storage: Arc<dyn KeyValueStorage>) -> Result<Self, Error> {
        let api_url = std::env::var("OUVIDORIA_API_URL")
            .map_err(|_| Error::config("OUVIDORIA_API_URL environment variable not found"))?;
        Self::new_with_options(&api_url, storage, ClientOptions::from_env()?)
    }

    /// The auth session controller
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// User account operations
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.api.clone())
    }

    /// Complaint operations
    pub fn complaints(&self) -> ComplaintsClient {
        ComplaintsClient::new(self.api.clone())
    }

    /// Occurrence operations
    pub fn occurrences(&self) -> OccurrencesClient {
        OccurrencesClient::new(self.api.clone())
    }

    /// Category operations
    pub fn categories(&self) -> CategoriesClient {
        CategoriesClient::new(self.api.clone())
    }

    /// Cached reads and invalidating writes over every service
    pub fn queries(&self) -> Queries {
        Queries::new(
            self.query.clone(),
            self.auth.clone(),
            self.users(),
            self.complaints(),
            self.occurrences(),
            self.categories(),
        )
    }

    /// The query cache shared by [`Ouvidoria::queries`]
    pub fn query_client(&self) -> &QueryClient {
        &self.query
    }

    /// The underlying API client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The options the client was built with
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{AuthState, Credentials, Session};
    pub use crate::categories::Category;
    pub use crate::complaints::{Complaint, NewComplaint};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::occurrences::{NewOccurrence, Occurrence, OccurrenceKind};
    pub use crate::status::RecordStatus;
    pub use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
    pub use crate::users::UserProfile;
    pub use crate::Ouvidoria;
}
