pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::AuthenticatedUser;
pub use middleware::{bearer_token, AuthMiddleware};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, AuthSettings, Identity, INVALID_CREDENTIALS, INVALID_TOKEN};
pub use token::{generate_token, verify_token, Claims};

/// Body of a successful `POST /login`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT to send back as `Authorization: Bearer <token>`.
    pub token: String,
}
