//! Authentication and session management for the Ouvidoria API

mod session;
mod types;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::Error;
use crate::fetch::ApiClient;
use crate::query::QueryClient;
use crate::users::UserProfile;

pub use session::*;
pub use types::*;

/// Auth session controller
///
/// Owns the in-memory [`AuthState`], keeps the session token on the shared
/// [`ApiClient`] in sync with it and persists sessions through a [`SessionStore`].
pub struct Auth {
    api: ApiClient,
    store: SessionStore,
    cache: QueryClient,
    state: watch::Sender<AuthState>,
}

impl Auth {
    /// Create a new Auth controller in the [`AuthState::Unknown`] state
    pub(crate) fn new(api: ApiClient, store: SessionStore, cache: QueryClient) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            api,
            store,
            cache,
            state,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// The current session, if authenticated
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    /// The signed-in user, if authenticated
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().session().map(|s| s.user.clone())
    }

    /// The session token, if authenticated
    pub fn token(&self) -> Option<String> {
        self.state.borrow().session().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Restore the persisted session on app start
    ///
    /// Any failure while restoring signs the user out locally instead of
    /// leaving partial state behind.
    pub async fn restore(&self) -> AuthState {
        match self.store.load().await {
            Ok(Some(session)) => {
                info!(user_id = session.user.id, "session restored");
                self.api.set_token(Some(session.token.clone()));
                self.state.send_replace(AuthState::Authenticated(session));
            }
            Ok(None) => {
                self.state.send_replace(AuthState::Unauthenticated);
            }
            Err(err) => {
                warn!(error = %err, "failed to restore session, signing out");
                self.clear_local().await;
            }
        }
        self.state()
    }

    /// Sign in with a CPF or e-mail and a password
    ///
    /// Cached queries are dropped before the new session is published, so
    /// lists fetched for a previous account are never served to this one.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, Error> {
        let result = self
            .api
            .post("login")
            .json(credentials)?
            .execute::<LoginResponse>()
            .await;

        let session = match result {
            Ok(response) => Session::from(response),
            Err(err) => {
                self.reject_sign_in();
                return Err(err);
            }
        };

        if let Err(err) = self.store.save(&session).await {
            warn!(error = %err, "failed to persist session");
            self.reject_sign_in();
            return Err(err);
        }

        self.cache.clear();
        self.api.set_token(Some(session.token.clone()));
        self.state.send_replace(AuthState::Authenticated(session.clone()));
        info!(user_id = session.user.id, "signed in");

        Ok(session)
    }

    /// Sign out, dropping the token, the persisted session and cached queries
    ///
    /// The in-memory session is always cleared. If the stored copy cannot be
    /// removed the error is returned and a later [`Auth::restore`] would bring
    /// that session back, so callers should retry.
    pub async fn sign_out(&self) -> Result<(), Error> {
        self.api.clear_token();
        self.cache.clear();
        self.state.send_replace(AuthState::Unauthenticated);
        if let Err(err) = self.store.remove().await {
            warn!(error = %err, "failed to remove stored session");
            return Err(err);
        }
        info!("signed out");
        Ok(())
    }

    /// Ask the API to e-mail a password reset link
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        self.api
            .post("esqueci_a_senha")
            .json(&ForgotPasswordRequest { email })?
            .execute_empty()
            .await
    }

    /// Deactivate the signed-in account, then sign out
    pub async fn deactivate_account(&self) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Err(Error::auth("Not logged in"));
        }
        self.api.post("desativar_conta").execute_empty().await?;
        self.sign_out().await
    }

    /// Register the device's notification token for the signed-in user
    pub async fn update_device_token(&self, device_token: &str) -> Result<(), Error> {
        if !self.is_authenticated() {
            return Err(Error::auth("Not logged in"));
        }
        self.api
            .post("atualizar_token")
            .json(&DeviceTokenRequest { device_token })?
            .execute_empty()
            .await
    }

    /// Replace the cached profile after it was updated on the server
    pub async fn replace_user(&self, user: UserProfile) -> Result<(), Error> {
        let Some(mut session) = self.session() else {
            return Err(Error::auth("Not logged in"));
        };
        if session.user.id != user.id {
            return Err(Error::auth("Profile belongs to another user"));
        }

        session.user = user;
        self.store.save(&session).await?;
        self.state.send_replace(AuthState::Authenticated(session));
        Ok(())
    }

    /// A failed sign-in leaves an existing session untouched
    fn reject_sign_in(&self) {
        self.state.send_if_modified(|state| {
            if state.is_authenticated() {
                return false;
            }
            *state = AuthState::Unauthenticated;
            true
        });
    }

    async fn clear_local(&self) {
        self.api.clear_token();
        self.cache.clear();
        self.state.send_replace(AuthState::Unauthenticated);
        if let Err(err) = self.store.remove().await {
            warn!(error = %err, "failed to remove stored session");
        }
    }
}
