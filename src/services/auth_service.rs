//! Domain service for user accounts and the credential/token scheme.
//!
//! There is no session table: a token is a pure function of the user's
//! credential epoch (`modification`), their username, and the server pepper.
//! Rotating the epoch on login or password change is what invalidates
//! previously issued tokens.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations. The router maps each
/// variant to a status class; messages stay free of internal identifiers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad or missing input; every violated field is listed.
    #[error("{0}")]
    Validation(String),

    #[error("User {0} already exists")]
    Conflict(String),

    /// Deliberately does not say which check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username vanished after validation passed; data-integrity anomaly.
    #[error("User {0} does not exist")]
    NotFound(String),

    #[error("{0}")]
    Storage(String),
}

/// Payload for `create` and `login`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
}

/// Payload for `validate`. A mismatch is an [`AuthError::InvalidCredentials`]
/// failure, never `validated: false`; `update` and `account` rely on the
/// short-circuit.
#[derive(Debug, Clone, Serialize)]
pub struct TokenValidation {
    pub validated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub updated: bool,
    pub login_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountProfile {
    pub name: String,
    pub last_login: String,
    pub email: String,
}

/// Domain service trait for account management.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and returns the initial session token.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] listing every violated field,
    /// [`AuthError::Conflict`] for a taken username, [`AuthError::Storage`]
    /// if the insert yields no row identity.
    async fn create(
        &self,
        username: &str,
        password: &str,
        name: &str,
        email: &str,
    ) -> Result<SessionToken, AuthError>;

    /// Verifies credentials, rotates the credential epoch, and returns a
    /// fresh token. Every successful login invalidates all earlier tokens.
    async fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError>;

    /// Recomputes the expected token from the stored epoch and compares.
    /// Read-only and idempotent.
    async fn validate(&self, username: &str, token: &str) -> Result<TokenValidation, AuthError>;

    /// Applies exactly the supplied fields. A password change rotates the
    /// epoch and sets `login_required`; name/email never do.
    async fn update(
        &self,
        username: &str,
        token: &str,
        password: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UpdateOutcome, AuthError>;

    /// Read-only profile fetch; `last_login` is the credential epoch.
    async fn account(&self, username: &str, token: &str) -> Result<AccountProfile, AuthError>;
}
