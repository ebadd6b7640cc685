//! Types for authentication

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::users::UserProfile;

/// Sign-in credentials
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// CPF or e-mail address
    #[serde(rename = "cpf_ou_email")]
    pub login: String,

    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
        }
    }
}

// Keep the password out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Body of a successful `POST /login`: the profile plus the session token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session {
            token: response.token,
            user: response.user,
        }
    }
}

/// Authentication state observed by the UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Startup, the stored session has not been read yet
    #[default]
    Unknown,
    /// A token and profile are available
    Authenticated(Session),
    /// No valid session
    Unauthenticated,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// Whether startup restoration is still pending
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Unknown)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeviceTokenRequest<'a> {
    #[serde(rename = "token_dispositivo")]
    pub device_token: &'a str,
}
