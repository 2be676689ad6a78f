use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, SessionToken};
use crate::{config::JwtConfig, state::AppState};

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub max_age_minutes: i64,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            max_age_minutes,
        } = config.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            max_age_minutes,
        }
    }

    /// Signs `token` with a fresh expiry; returns the JWT and its expiry time.
    pub fn sign(&self, token: &SessionToken) -> anyhow::Result<(String, OffsetDateTime)> {
        anyhow::ensure!(self.max_age_minutes > 0, "session max age must be positive");
        let max_age = self
            .max_age_minutes
            .checked_mul(60)
            .map(TimeDuration::seconds)
            .context("session max age overflows")?;
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(max_age)
            .context("session expiry out of range")?;
        let claims = Claims {
            token: token.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let jwt = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = ?token.id, "session token signed");
        Ok((jwt, exp))
    }

    pub fn verify(&self, jwt: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(jwt, &self.decoding, &validation)?;
        debug!(user_id = ?data.claims.token.id, "session token verified");
        Ok(data.claims)
    }
}
