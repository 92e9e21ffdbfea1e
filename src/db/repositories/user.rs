use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::users;

/// Partial field set for a profile update. Credential rotation carries the
/// new epoch and hash as a pair; they are never written separately.
#[derive(Debug, Default)]
pub struct ProfileChanges<'a> {
    /// `(new_epoch, new_hash)` when the password is being changed.
    pub credentials: Option<(&'a str, &'a str)>,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl ProfileChanges<'_> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.credentials.is_none() && self.name.is_none() && self.email.is_none()
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    /// Insert a new user row, returning the assigned id.
    pub async fn insert(
        &self,
        username: &str,
        hash: &str,
        name: &str,
        email: &str,
        modification: &str,
    ) -> Result<i32> {
        let active = users::ActiveModel {
            username: Set(username.to_string()),
            hash: Set(hash.to_string()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            modification: Set(modification.to_string()),
            ..Default::default()
        };

        let inserted = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(inserted.id)
    }

    /// Rotate the credential epoch and hash together, conditioned on the
    /// previously read epoch. A concurrent rotation makes the condition miss
    /// and zero rows come back, instead of silently overwriting.
    pub async fn rotate_credentials(
        &self,
        id: i32,
        previous_epoch: &str,
        epoch: &str,
        hash: &str,
    ) -> Result<u64> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Modification, Expr::value(epoch))
            .col_expr(users::Column::Hash, Expr::value(hash))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Modification.eq(previous_epoch))
            .exec(&self.conn)
            .await
            .context("Failed to rotate user credentials")?;

        Ok(result.rows_affected)
    }

    /// Apply exactly the supplied fields. When credentials are part of the
    /// change set the update is conditioned on `previous_epoch`, same as
    /// [`Self::rotate_credentials`].
    pub async fn update_profile(
        &self,
        id: i32,
        previous_epoch: &str,
        changes: &ProfileChanges<'_>,
    ) -> Result<u64> {
        let mut update = users::Entity::update_many().filter(users::Column::Id.eq(id));

        if let Some((epoch, hash)) = changes.credentials {
            update = update
                .col_expr(users::Column::Modification, Expr::value(epoch))
                .col_expr(users::Column::Hash, Expr::value(hash))
                .filter(users::Column::Modification.eq(previous_epoch));
        }

        if let Some(name) = changes.name {
            update = update.col_expr(users::Column::Name, Expr::value(name));
        }

        if let Some(email) = changes.email {
            update = update.col_expr(users::Column::Email, Expr::value(email));
        }

        let result = update
            .exec(&self.conn)
            .await
            .context("Failed to update user profile")?;

        Ok(result.rows_affected)
    }
}
