pub mod health;
pub mod mottagning;

pub use health::{health_check, readiness_check};
pub use mottagning::{check_password, reception_feed, CREDENTIAL_COOKIE, CREDENTIAL_HEADER};
