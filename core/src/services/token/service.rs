//! Main token service implementation

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::UserView;
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Signs and verifies HS256 access tokens
#[derive(Clone)]
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generates an access token embedding the account's public fields
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(TokenError)` - Token generation failed
    pub fn issue_access_token(&self, user: &UserView) -> Result<String, TokenError> {
        let claims = Claims::for_user(user, self.config.access_token_ttl_seconds);
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::TokenGenerationFailed(e.to_string()))
    }

    /// Verifies an access token and returns the claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::TokenExpired,
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::Json(_) | JwtErrorKind::MissingRequiredClaim(_) => {
                    TokenError::InvalidClaims
                }
                _ => TokenError::InvalidTokenFormat,
            })?;

        Ok(token_data.claims)
    }
}
