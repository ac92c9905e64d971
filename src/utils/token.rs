use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorMessage, HttpError};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Decode a token and return the profile id it carries. Tokens are minted
/// by the identity provider with the same shared secret.
pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<String, HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    // Mirrors what the identity provider does with the shared secret.
    fn create_token(user_id: &str, secret: &[u8], expires_in_seconds: i64) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::seconds(expires_in_seconds)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_token_round_trip() {
        let user_id = uuid::Uuid::new_v4().to_string();
        let secret = b"test-secret";

        let token = create_token(&user_id, secret, 60);
        let decoded = decode_token(token, secret).unwrap();

        assert_eq!(decoded, user_id);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = create_token("some-user", b"secret-a", 60);
        let result = decode_token(token, b"secret-b");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = create_token("some-user", b"secret", -120);
        let result = decode_token(token, b"secret");
        assert!(result.is_err());
    }
}
