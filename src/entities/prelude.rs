pub use super::error_log::Entity as ErrorLog;
pub use super::users::Entity as Users;
