use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Session lifetime; every refresh pushes `exp` this far into the future.
    pub max_age_minutes: i64,
}

const DEFAULT_SESSION_MAX_AGE_MINUTES: i64 = 60 * 24 * 30;
const MAX_SESSION_MAX_AGE_MINUTES: i64 = 60 * 24 * 365 * 10;

/// Parses `SESSION_MAX_AGE_MINUTES`; unset means 30 days. Accepts 1 minute up to 10 years.
fn session_max_age(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_MAX_AGE_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("SESSION_MAX_AGE_MINUTES is not a number: {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_SESSION_MAX_AGE_MINUTES).contains(&minutes),
        "SESSION_MAX_AGE_MINUTES must be between 1 and {MAX_SESSION_MAX_AGE_MINUTES}, got {minutes}"
    );
    Ok(minutes)
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesConfig {
    /// Where failed sign-ins are sent, with `?error=<code>` appended.
    pub error: String,
}

/// Client id/secret pair of a registered OAuth application.
#[derive(Clone, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    pub google: Option<OAuthClient>,
    pub github: Option<OAuthClient>,
    pub apple: Option<OAuthClient>,
}

impl ProvidersConfig {
    /// Reads `<PREFIX>_CLIENT_ID` / `<PREFIX>_CLIENT_SECRET` pairs through `lookup`.
    /// A provider is only configured when both halves are non-empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let client = |prefix: &str| {
            let client_id = lookup(&format!("{prefix}_CLIENT_ID")).filter(|v| !v.is_empty())?;
            let client_secret =
                lookup(&format!("{prefix}_CLIENT_SECRET")).filter(|v| !v.is_empty())?;
            Some(OAuthClient {
                client_id,
                client_secret,
            })
        };
        Self {
            google: client("GOOGLE"),
            github: client("GITHUB"),
            apple: client("APPLE"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub pages: PagesConfig,
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "authgate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authgate-users".into()),
            max_age_minutes: session_max_age(std::env::var("SESSION_MAX_AGE_MINUTES").ok())?,
        };
        let pages = PagesConfig {
            error: std::env::var("AUTH_ERROR_PAGE").unwrap_or_else(|_| "/sign-in".into()),
        };
        let providers = ProvidersConfig::from_lookup(|key| std::env::var(key).ok());
        Ok(Self {
            database_url,
            jwt,
            pages,
            providers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn provider_needs_both_id_and_secret() {
        let providers = ProvidersConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CLIENT_ID", "g-id"),
            ("GOOGLE_CLIENT_SECRET", "g-secret"),
            ("GITHUB_CLIENT_ID", "gh-id"),
            ("APPLE_CLIENT_ID", "a-id"),
            ("APPLE_CLIENT_SECRET", ""),
        ]));

        let google = providers.google.expect("google configured");
        assert_eq!(google.client_id, "g-id");
        assert_eq!(google.client_secret, "g-secret");
        assert!(providers.github.is_none());
        assert!(providers.apple.is_none());
    }

    #[test]
    fn debug_output_redacts_client_secret() {
        let client = OAuthClient {
            client_id: "id".into(),
            client_secret: "top-secret".into(),
        };
        let rendered = format!("{client:?}");
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn session_max_age_defaults_and_bounds() {
        assert_eq!(session_max_age(None).unwrap(), DEFAULT_SESSION_MAX_AGE_MINUTES);
        assert_eq!(session_max_age(Some(" 90 ".into())).unwrap(), 90);
        assert_eq!(
            session_max_age(Some(MAX_SESSION_MAX_AGE_MINUTES.to_string())).unwrap(),
            MAX_SESSION_MAX_AGE_MINUTES
        );
        for bad in ["0", "-1", "10000000000", "9223372036854775807", "forever"] {
            assert!(session_max_age(Some(bad.into())).is_err(), "{bad}");
        }
    }
}
