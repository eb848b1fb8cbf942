pub mod config;
pub mod helpers;
pub mod middleware;
pub mod password;
pub mod types;

pub use config::SessionConfig;
pub use helpers::get_auth_user;
pub use middleware::require_staff;
pub use password::{DEFAULT_HASH_COST, hash_password, hash_password_with_cost, verify_password};
pub use types::{AuthError, AuthUser};
