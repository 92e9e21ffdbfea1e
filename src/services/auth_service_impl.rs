//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::credentials::{derive_password_hash, derive_session_token, rotate_credential_epoch};
use crate::db::{ProfileChanges, Store};
use crate::services::auth_service::{
    AccountProfile, AuthError, AuthService, SessionToken, TokenValidation, UpdateOutcome,
};
use crate::api::validation::{is_valid_email, trimmed_non_empty};

pub struct SeaOrmAuthService {
    store: Store,
    pepper: String,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, pepper: String) -> Self {
        Self { store, pepper }
    }

    /// Report a storage failure to the diagnostic sink and produce the
    /// caller-visible error. The sink is best effort and never fails the
    /// primary operation.
    async fn storage_failure(&self, line: u32, context: &str, message: &str) -> AuthError {
        self.store
            .report_storage_failure(file!(), line, context)
            .await;
        AuthError::Storage(message.to_string())
    }

    async fn find_user(&self, username: &str) -> Result<Option<crate::db::UserRow>, AuthError> {
        match self.store.find_user(username).await {
            Ok(user) => Ok(user),
            Err(e) => Err(self
                .storage_failure(
                    line!(),
                    &format!("find_user({username}): {e}"),
                    "Unable to look up user in the database",
                )
                .await),
        }
    }
}

fn collect_required(fields: &[(&str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| format!("{field} is required"))
        .collect()
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn create(
        &self,
        username: &str,
        password: &str,
        name: &str,
        email: &str,
    ) -> Result<SessionToken, AuthError> {
        let username = username.trim();
        let password = password.trim();
        let name = name.trim();
        let email = email.trim();

        // Accumulate every violation; callers see the full list at once.
        let mut errors = collect_required(&[
            ("Username", username),
            ("Password", password),
            ("Name", name),
        ]);
        if !is_valid_email(email) {
            errors.push("Email is invalid".to_string());
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors.join("\n")));
        }

        if self.find_user(username).await?.is_some() {
            return Err(AuthError::Conflict(username.to_string()));
        }

        let epoch = rotate_credential_epoch();
        let hash = derive_password_hash(&epoch, password, &self.pepper);

        let inserted = self
            .store
            .insert_user(username, &hash, name, email, &epoch)
            .await;
        match inserted {
            Ok(id) if id > 0 => {}
            Ok(_) => {
                return Err(self
                    .storage_failure(
                        line!(),
                        &format!("insert_user({username}) yielded no row identity"),
                        "Unable to insert new user into the database",
                    )
                    .await);
            }
            Err(e) => {
                return Err(self
                    .storage_failure(
                        line!(),
                        &format!("insert_user({username}): {e}"),
                        "Unable to insert new user into the database",
                    )
                    .await);
            }
        }

        Ok(SessionToken {
            token: derive_session_token(&epoch, username, &self.pepper),
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<SessionToken, AuthError> {
        let username = username.trim();
        let password = password.trim();

        let errors = collect_required(&[("Username", username), ("Password", password)]);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors.join("\n")));
        }

        // Recompute the expected hash from the stored epoch; the pair
        // (username, hash) is the lookup predicate.
        let user = self
            .find_user(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let expected = derive_password_hash(&user.modification, password, &self.pepper);
        if user.hash != expected {
            return Err(AuthError::InvalidCredentials);
        }

        // Logging in anew: rotate the epoch, invalidating all prior tokens.
        // The update is conditioned on the epoch just read, so a concurrent
        // login surfaces as zero rows instead of a token/salt mismatch.
        let epoch = rotate_credential_epoch();
        let hash = derive_password_hash(&epoch, password, &self.pepper);

        let rows = self
            .store
            .rotate_user_credentials(user.id, &user.modification, &epoch, &hash)
            .await;
        match rows {
            Ok(0) => {
                return Err(self
                    .storage_failure(
                        line!(),
                        &format!("rotate_user_credentials({username}) affected zero rows"),
                        "Unable to update user in the database",
                    )
                    .await);
            }
            Ok(_) => {}
            Err(e) => {
                return Err(self
                    .storage_failure(
                        line!(),
                        &format!("rotate_user_credentials({username}): {e}"),
                        "Unable to update user in the database",
                    )
                    .await);
            }
        }

        Ok(SessionToken {
            token: derive_session_token(&epoch, username, &self.pepper),
        })
    }

    async fn validate(&self, username: &str, token: &str) -> Result<TokenValidation, AuthError> {
        let username = username.trim();
        let token = token.trim();

        let errors = collect_required(&[("Username", username), ("Token", token)]);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors.join("\n")));
        }

        let user = self
            .find_user(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let expected = derive_session_token(&user.modification, username, &self.pepper);
        if token != expected {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(TokenValidation { validated: true })
    }

    async fn update(
        &self,
        username: &str,
        token: &str,
        password: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UpdateOutcome, AuthError> {
        self.validate(username, token).await?;

        let username = username.trim();
        let user = self
            .find_user(username)
            .await?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))?;

        let password = trimmed_non_empty(password);
        let name = trimmed_non_empty(name);
        let email = trimmed_non_empty(email);

        if let Some(email) = email
            && !is_valid_email(email)
        {
            return Err(AuthError::Validation("Email is invalid".to_string()));
        }

        let rotation = password.map(|p| {
            let epoch = rotate_credential_epoch();
            let hash = derive_password_hash(&epoch, p, &self.pepper);
            (epoch, hash)
        });

        let changes = ProfileChanges {
            credentials: rotation
                .as_ref()
                .map(|(epoch, hash)| (epoch.as_str(), hash.as_str())),
            name,
            email,
        };

        if changes.is_empty() {
            return Ok(UpdateOutcome {
                updated: false,
                login_required: false,
            });
        }

        let rows = self
            .store
            .update_user_profile(user.id, &user.modification, &changes)
            .await;
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                return Err(self
                    .storage_failure(
                        line!(),
                        &format!("update_user_profile({username}): {e}"),
                        "Unable to update user in the database",
                    )
                    .await);
            }
        };

        Ok(UpdateOutcome {
            updated: rows > 0,
            login_required: rotation.is_some(),
        })
    }

    async fn account(&self, username: &str, token: &str) -> Result<AccountProfile, AuthError> {
        self.validate(username, token).await?;

        let username = username.trim();
        let user = self
            .find_user(username)
            .await?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))?;

        Ok(AccountProfile {
            name: user.name,
            last_login: user.modification,
            email: user.email,
        })
    }
}
