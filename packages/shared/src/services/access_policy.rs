use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::{Caller, IssuedToken, TokenClaims};
use crate::services::errors::access_policy_errors::AccessPolicyError;

/// Resolves the identity a request acts under from its `Authorization` header.
pub trait AccessPolicy: Send + Sync {
    fn resolve(&self, authorization: Option<&str>) -> Result<Caller, AccessPolicyError>;
}

pub struct JwtAccessPolicy {
    jwt_secret: String,
    token_ttl: Duration,
}

impl JwtAccessPolicy {
    pub fn new(jwt_secret: String) -> Self {
        JwtAccessPolicy {
            jwt_secret,
            token_ttl: Duration::hours(15),
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Signs a bearer token for `player_id`. Account login lives elsewhere;
    /// this exists for operators and test harnesses.
    pub fn issue_token(
        &self,
        player_id: &str,
        is_admin: bool,
    ) -> Result<IssuedToken, AccessPolicyError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: player_id.to_string(),
            is_admin,
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AccessPolicyError::JwtError(format!("{:#?}", e)))?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AccessPolicyError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let validation = Validation::default();

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                if token_data.claims.sub.is_empty() {
                    Err(AccessPolicyError::InvalidToken)
                } else {
                    Ok(token_data.claims)
                }
            }
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(AccessPolicyError::ExpiredToken)
                }
                _ => Err(AccessPolicyError::InvalidToken),
            },
        }
    }
}

impl AccessPolicy for JwtAccessPolicy {
    fn resolve(&self, authorization: Option<&str>) -> Result<Caller, AccessPolicyError> {
        let header = authorization.ok_or(AccessPolicyError::MissingCredentials)?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AccessPolicyError::MalformedHeader("expected a Bearer token".to_string())
        })?;

        let claims = self.verify_token(token.trim())?;
        Ok(Caller {
            player_id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}
