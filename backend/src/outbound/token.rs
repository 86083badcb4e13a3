//! JWT token adapter implementing the domain's `TokenService` port.
//!
//! Issues HS256-signed access and refresh tokens. The access token is the
//! only kind accepted for API calls; a refresh token presented as a bearer
//! credential is rejected as invalid even though its signature checks out.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenPair, TokenService};

const ACCESS_TTL_MINUTES: i64 = 30;
const REFRESH_TTL_DAYS: i64 = 1;

const KIND_ACCESS: &str = "access";
const KIND_REFRESH: &str = "refresh";

/// JWT claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
    kind: String,
}

/// HS256 JWT implementation of the `TokenService` port.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtTokenService {
    /// Create a token service from the shared signing secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    fn sign(&self, user_id: Uuid, kind: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            kind: kind.to_owned(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            TokenError::Issue {
                message: err.to_string(),
            }
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign(user_id, KIND_ACCESS, Duration::minutes(ACCESS_TTL_MINUTES))?,
            refresh: self.sign(user_id, KIND_REFRESH, Duration::days(REFRESH_TTL_DAYS))?,
        })
    }

    fn verify_access(&self, token: &str) -> Result<Uuid, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        if data.claims.kind != KIND_ACCESS {
            return Err(TokenError::Invalid);
        }
        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}
