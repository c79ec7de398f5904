//! Principal tokens. The gateway only verifies them; `issue` exists for
//! tooling and tests that need a token signed with the same secret.

use chrono::{Duration, Utc};
use courier_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
}

/// HS256 signer/verifier keyed by the app secret
#[derive(Clone)]
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    leeway_seconds: u64,
}

impl JwtVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_seconds,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.app_secret, config.leeway_seconds)
    }

    /// Sign a token for `uid` that expires after `ttl`.
    pub fn issue(&self, uid: &str, ttl: Duration) -> GatewayResult<String> {
        let claims = Claims {
            uid: uid.to_string(),
            email: None,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Internal(format!("failed to sign token: {e}")))
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> GatewayResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        // Clients only ever see "invalid token"; the decode cause stays in the log.
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "rejected token");
                invalid_token()
            })?;

        if claims.uid.trim().is_empty() {
            debug!("rejected token without user id");
            return Err(invalid_token());
        }

        Ok(claims)
    }
}

fn invalid_token() -> GatewayError {
    GatewayError::Unauthenticated("invalid token".to_string())
}
