mod crypto;
mod extractor;
mod jwt;

pub use crypto::{hash_password, verify_password};
pub use extractor::{AuthUser, MaybeAuthUser};
pub use jwt::issue_token;
