pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{
    AccountProfile, AuthError, AuthService, SessionToken, TokenValidation, UpdateOutcome,
};
pub use auth_service_impl::SeaOrmAuthService;

pub mod error_log_service;
pub mod error_log_service_impl;
pub use error_log_service::{Cleared, DeletedCount, ErrorLogError, ErrorLogPage, ErrorLogService};
pub use error_log_service_impl::SeaOrmErrorLogService;
