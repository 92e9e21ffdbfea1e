pub mod prelude;

pub mod error_log;
pub mod users;
