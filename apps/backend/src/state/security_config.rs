//! Token-signing configuration shared by the auth endpoints and extractors.

use jsonwebtoken::Algorithm;

/// Key material and algorithm for issuing and verifying access tokens.
///
/// Built from `JWT_SECRET` at startup; the `Default` impl exists only so
/// tests can mint and verify tokens without touching the environment.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// HS256 with the given secret. Symmetric signing is enough here since
    /// the backend is the only party that mints or checks tokens.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"sketch-backend-test-signing-key".as_slice())
    }
}
