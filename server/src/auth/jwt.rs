//! Bearer token issuing and verification.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use recipi_core::Claims;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("expiration_hours", &self.config.expiration_hours)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues a token whose claims name the user by id and current username.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims::new(user_id, username, self.config.expiration_hours);
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verifies signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(secret: &str) -> JwtManager {
        JwtManager::new(JwtConfig::new(secret, 1))
    }

    #[test]
    fn test_generate_and_validate() {
        let jwt = manager("test-secret-key-long-enough");
        let user_id = Uuid::new_v4();

        let token = jwt.generate_token(user_id, "osman").unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.username, "osman");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager("secret-one-long-enough")
            .generate_token(Uuid::new_v4(), "osman")
            .unwrap();
        assert!(manager("secret-two-long-enough")
            .validate_token(&token)
            .is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtManager::new(JwtConfig::new("test-secret-key-long-enough", 0));
        let mut claims = Claims::new(Uuid::new_v4(), "osman", 0);
        claims.exp -= 3600;
        let token = encode(&Header::default(), &claims, &jwt.encoding_key).unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }
}
