//! Signed bearer tokens (HS256 JWT)

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{DomainError, Identity, Role, User};

/// Token lifetime in seconds (1 hour)
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// JWT payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub jti: Uuid,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.role)
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.ttl_secs,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Check signature, issuer, audience and expiry (no clock skew allowance).
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            DomainError::InvalidToken
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use rust_decimal::Decimal;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            mobile: "555-0100".to_string(),
            role,
            status: UserStatus::Approved,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret-test-secret-test-secret", "test-iss", "test-aud")
    }

    #[test]
    fn sign_and_verify_token() {
        let user = user(Role::Admin);
        let token = keys().sign(&user).expect("sign");
        let claims = keys().verify(&token).expect("verify");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert_eq!(claims.identity(), Identity::new(user.id, Role::Admin));
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let user = user(Role::User);
        let a = keys().verify(&keys().sign(&user).unwrap()).unwrap();
        let b = keys().verify(&keys().sign(&user).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let token = keys().sign(&user(Role::User)).unwrap();
        let other = JwtKeys::new("test-secret-test-secret-test-secret", "other-iss", "other-aud");
        assert_eq!(other.verify(&token).unwrap_err(), DomainError::InvalidToken);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = keys().sign(&user(Role::User)).unwrap();
        let other = JwtKeys::new("another-secret-another-secret-xx", "test-iss", "test-aud");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let expired = keys().with_ttl_secs(-5);
        let token = expired.sign(&user(Role::User)).unwrap();
        assert_eq!(keys().verify(&token).unwrap_err(), DomainError::InvalidToken);
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(keys().verify("not.a.token").is_err());
    }
}
