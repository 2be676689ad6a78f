use super::dto::{ProviderInfo, ProviderKind};
use crate::config::{OAuthClient, ProvidersConfig};

/// Enabled providers in sign-in page order. OAuth providers appear only
/// when their client credentials are configured; credentials is always on.
pub fn enabled_providers(config: &ProvidersConfig, base_path: &str) -> Vec<ProviderInfo> {
    let oauth: [(&'static str, &'static str, &Option<OAuthClient>); 3] = [
        ("google", "Google", &config.google),
        ("github", "GitHub", &config.github),
        ("apple", "Apple", &config.apple),
    ];

    oauth
        .into_iter()
        .filter(|(_, _, client)| client.is_some())
        .map(|(id, name, _)| describe(id, name, ProviderKind::OAuth, base_path))
        .chain(std::iter::once(describe(
            "credentials",
            "Credentials",
            ProviderKind::Credentials,
            base_path,
        )))
        .collect()
}

fn describe(id: &'static str, name: &'static str, kind: ProviderKind, base_path: &str) -> ProviderInfo {
    ProviderInfo {
        id,
        name,
        kind,
        signin_url: format!("{base_path}/signin/{id}"),
        callback_url: format!("{base_path}/callback/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Option<OAuthClient> {
        Some(OAuthClient {
            client_id: "id".into(),
            client_secret: "secret".into(),
        })
    }

    #[test]
    fn credentials_only_without_oauth_config() {
        let providers = enabled_providers(&ProvidersConfig::default(), "/api/auth");
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, "credentials");
        assert_eq!(providers[0].kind, ProviderKind::Credentials);
        assert_eq!(providers[0].callback_url, "/api/auth/callback/credentials");
    }

    #[test]
    fn configured_oauth_providers_come_first() {
        let config = ProvidersConfig {
            google: client(),
            github: None,
            apple: client(),
        };
        let ids: Vec<_> = enabled_providers(&config, "/api/auth")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["google", "apple", "credentials"]);
    }

    #[test]
    fn listing_never_contains_secrets() {
        let config = ProvidersConfig {
            github: client(),
            ..ProvidersConfig::default()
        };
        let json = serde_json::to_string(&enabled_providers(&config, "/api/auth")).unwrap();
        assert!(json.contains("\"type\":\"oauth\""));
        assert!(!json.contains("secret"));
    }
}
