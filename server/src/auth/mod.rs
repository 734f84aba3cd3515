mod crypto;
mod db;
mod extractor;
mod jwt;

pub use crypto::{hash_password, verify_password};
pub use db::{find_user_by_username, issue_token, username_taken};
pub use extractor::AuthUser;
pub use jwt::{JwtConfig, JwtManager};
