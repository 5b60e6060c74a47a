use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, TokenPurpose},
    config::JwtConfig,
    state::AppState,
};

/// Signing and verification keys plus per-purpose lifetimes, derived from
/// the process-wide secret. Read-only after startup.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub reset_ttl: Duration,
    pub verify_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.access_ttl_minutes),
            reset_ttl: Duration::minutes(cfg.reset_ttl_minutes),
            verify_ttl: Duration::minutes(cfg.verify_ttl_minutes),
        }
    }

    fn sign(
        &self,
        user_id: i64,
        purpose: TokenPurpose,
        email: Option<String>,
        fingerprint: Option<String>,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match purpose {
            TokenPurpose::Access => self.access_ttl,
            TokenPurpose::Reset => self.reset_ttl,
            TokenPurpose::Verify => self.verify_ttl,
        };
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            purpose,
            email,
            fingerprint,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, purpose = ?purpose, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, user_id: i64) -> anyhow::Result<String> {
        self.sign(user_id, TokenPurpose::Access, None, None)
    }

    pub fn sign_reset(&self, user_id: i64, fingerprint: String) -> anyhow::Result<String> {
        self.sign(user_id, TokenPurpose::Reset, None, Some(fingerprint))
    }

    pub fn sign_verify(&self, user_id: i64, email: String) -> anyhow::Result<String> {
        self.sign(user_id, TokenPurpose::Verify, Some(email), None)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, purpose = ?data.claims.purpose, "jwt verified");
        Ok(data.claims)
    }

    /// Verify and additionally require the purpose the flow expects;
    /// a valid token of the wrong purpose is still an invalid token.
    pub fn verify_purpose(&self, token: &str, purpose: TokenPurpose) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.purpose != purpose {
            anyhow::bail!("wrong token purpose");
        }
        Ok(claims)
    }
}
