use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Access token lifetime: 24 hours
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Claims included in our backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, stringified
    pub sub: String,
    pub login: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Parse the user id out of `sub`.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::unauthorized_invalid_jwt())
    }
}

/// Mint a HS256 JWT access token.
pub fn mint_access_token(
    user_id: i64,
    login: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        login: login.to_string(),
        iat,
        exp: iat + TOKEN_TTL_SECS,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a JWT and return its claims.
///
/// Errors:
/// - Expired token → `AppError::unauthorized_expired_jwt()`
/// - Any other decode error → `AppError::unauthorized_invalid_jwt()`
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin the configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{mint_access_token, verify_access_token, TOKEN_TTL_SECS};
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn mint_and_verify_roundtrip() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        let now = SystemTime::now();

        let token = mint_access_token(42, "painter", now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.login, "painter");
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());
        // Mint far enough in the past that the 24h token is expired
        let now = SystemTime::now() - Duration::from_secs((TOKEN_TTL_SECS + 600) as u64);

        let token = mint_access_token(7, "latecomer", now, &security).unwrap();
        let result = verify_access_token(&token, &security);

        assert!(matches!(result, Err(AppError::UnauthorizedExpiredJwt)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let token = mint_access_token(7, "user", SystemTime::now(), &security_a).unwrap();

        let security_b = SecurityConfig::new("secret-B".as_bytes());
        let result = verify_access_token(&token, &security_b);

        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let security = SecurityConfig::default();
        let result = verify_access_token("not-a-jwt", &security);
        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }
}
