use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// SHA-512 hex digest of `modification || password || pepper`.
    pub hash: String,

    pub name: String,

    pub email: String,

    /// Credential epoch: last login/update time, and the salt for `hash`.
    /// Only ever written together with `hash`.
    pub modification: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
