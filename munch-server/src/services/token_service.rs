use jsonwebtoken::errors::Error;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::configs::Auth;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub token: String,
    pub iat: u64,
    pub exp: u64,
}

/// Claims carried by a bearer token. `sub` is the caller's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Clone)]
pub struct TokenService {
    expiration: u64,
    secret: String,
}

impl TokenService {
    pub fn new(auth: Auth) -> Self {
        Self {
            expiration: auth.expiration,
            secret: auth.secret.clone(),
        }
    }

    pub fn retrieve_token_claims(&self, token: &str) -> Result<TokenData<TokenClaims>, Error> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
    }

    pub fn generate_token(&self, user_id: &str) -> Result<Token, Error> {
        let iat = OffsetDateTime::now_utc().unix_timestamp().max(0) as u64;
        let exp = iat + self.expiration;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        let token = encode(&Header::default(), &claims, &encoding_key)?;

        Ok(Token {
            id: claims.sub,
            token,
            iat,
            exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_service(secret: &str) -> TokenService {
        TokenService::new(Auth {
            secret: String::from(secret),
            expiration: 1000,
        })
    }

    #[test]
    fn test_generate_and_retrieve_token() {
        let token_service = token_service("test");

        let token = token_service.generate_token("user-42").unwrap();

        let claims = token_service
            .retrieve_token_claims(&token.token)
            .unwrap()
            .claims;

        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.exp, claims.iat + 1000);
    }

    #[test]
    fn test_reject_foreign_signature() {
        let token = token_service("one").generate_token("user-42").unwrap();

        assert!(token_service("two")
            .retrieve_token_claims(&token.token)
            .is_err());
    }
}
