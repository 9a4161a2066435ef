//! Signed admin session tokens.
//!
//! HS256 JWTs carried in the admin session cookie. The token only names the admin;
//! permissions are read from the database on every request so revocations apply
//! immediately.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "storefront";

/// Clock skew tolerated when checking `exp` and `nbf`.
const LEEWAY_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(username: impl Into<String>, ttl: Duration) -> Self {
        let iat = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2);
        SessionClaims {
            sub: username.into(),
            iss: ISSUER.to_string(),
            iat,
            nbf: iat - LEEWAY_SECS as i64,
            exp: iat.saturating_add(ttl),
        }
    }
}

#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        SessionSigner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sign(&self, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims::new(username, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verifies signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_nbf = true;
        validation.leeway = LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn signed_token_verifies() {
        let signer = SessionSigner::new(SECRET, Duration::from_secs(600));
        let token = signer.sign("root").unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "root");
        assert_eq!(claims.iss, "storefront");
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let signer = SessionSigner::new(SECRET, Duration::from_secs(600));
        let other = SessionSigner::new(b"another-secret-another-secret-xx", Duration::from_secs(600));
        let token = other.sign("root").unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = SessionSigner::new(SECRET, Duration::from_secs(600));
        let mut claims = SessionClaims::new("root", Duration::from_secs(600));
        claims.exp = claims.iat - 3600;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(signer.verify(&token).is_err());
    }
}
