//! Session tokens for identities asserted by an external provider.
//!
//! The provider (Google, via the frontend) verifies the person; this service only
//! upserts the user row and signs a short-lived HS256 token whose subject is the email.

pub mod extractor;
pub mod handlers;
pub mod token;

pub use extractor::{require_auth, CurrentUser};
pub use token::TokenService;
