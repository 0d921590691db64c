use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;
use crate::error::AuthFailure;
use crate::state::AppState;

use super::claims::Claims;

/// Signing material derived once from process configuration.
///
/// Obtained per request via `FromRef`, which only clones the prepared
/// keys; the secret itself is never re-read after startup.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Issue a signed token asserting `user_id` until now + ttl.
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Validate signature, signing algorithm and expiry, returning the
    /// embedded claims.
    ///
    /// The algorithm is pinned to HS256, so a token re-signed under a
    /// substituted scheme is rejected before signature comparison.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthFailure> {
        let validation = Validation::new(Algorithm::HS256);
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthFailure::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => AuthFailure::InvalidSignature,
                _ => AuthFailure::MalformedClaims,
            })?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn keys_with_secret(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(300),
        }
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn expired_token_fails() {
        let keys = make_keys();

        // Manually build an already-expired token, past the default
        // 60-second validation leeway.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: 1,
            iat: (now - 600) as usize,
            exp: (now - 300) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");

        assert_eq!(keys.verify(&token).unwrap_err(), AuthFailure::Expired);
    }

    #[test]
    fn wrong_key_fails() {
        let token = keys_with_secret("secret-alpha").sign(1).expect("sign");
        let err = keys_with_secret("secret-bravo").verify(&token).unwrap_err();
        assert_eq!(err, AuthFailure::InvalidSignature);
    }

    #[tokio::test]
    async fn substituted_algorithm_rejected() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: 1,
            iat: now as usize,
            exp: (now + 300) as usize,
        };
        // Same secret, different scheme: must never reach signature
        // comparison under the HS256 pin.
        let token = encode(&Header::new(Algorithm::HS384), &claims, &keys.encoding)
            .expect("encode");

        assert_eq!(keys.verify(&token).unwrap_err(), AuthFailure::InvalidSignature);
    }

    #[tokio::test]
    async fn spliced_token_fails() {
        let keys = make_keys();
        let for_user_1 = keys.sign(1).expect("sign");
        let for_user_2 = keys.sign(2).expect("sign");

        // Payload of one token with the signature of another.
        let head: Vec<&str> = for_user_2.split('.').collect();
        let sig = for_user_1.split('.').nth(2).expect("signature segment");
        let spliced = format!("{}.{}.{}", head[0], head[1], sig);

        assert_eq!(keys.verify(&spliced).unwrap_err(), AuthFailure::InvalidSignature);
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let keys = make_keys();
        let err = keys.verify("not-a-jwt").unwrap_err();
        assert_eq!(err, AuthFailure::MalformedClaims);
    }
}
