//! Persistent settings and their resolution against command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use featherkey_oauth1::{Endpoints, TransportConfig};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;

/// Endpoint overrides for providers other than Twitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Display name.
    pub name: String,
    /// Request token endpoint.
    pub request_token_url: String,
    /// Authorization page.
    pub authorize_url: String,
    /// Access token endpoint.
    pub access_token_url: String,
    /// xAuth access token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xauth_access_token_url: Option<String>,
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Consumer key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    /// Consumer secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    /// Custom provider; Twitter when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderSettings>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Default location: `<config dir>/featherkey/config.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("featherkey")
            .join("config.json")
    }

    /// Loads settings, returning defaults if the file does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(settings)
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Consumer key.
    pub consumer_key: String,
    /// Consumer secret.
    pub consumer_secret: String,
    /// Provider endpoints.
    pub endpoints: Endpoints,
    /// Transport settings.
    pub transport: TransportConfig,
}

/// Merges flags (and their environment variables) over file settings.
pub fn resolve(args: &GlobalArgs, settings: Settings) -> Result<Resolved> {
    let Some(consumer_key) = args.consumer_key.clone().or(settings.consumer_key) else {
        bail!("consumer key missing: pass --consumer-key or set FEATHERKEY_CONSUMER_KEY");
    };
    let Some(consumer_secret) = args.consumer_secret.clone().or(settings.consumer_secret) else {
        bail!("consumer secret missing: pass --consumer-secret or set FEATHERKEY_CONSUMER_SECRET");
    };

    let endpoints = match settings.provider {
        Some(provider) => {
            let endpoints = Endpoints::new(
                provider.name,
                provider.request_token_url,
                provider.authorize_url,
                provider.access_token_url,
            )?;
            match provider.xauth_access_token_url {
                Some(url) => endpoints.with_xauth_access_token_url(url)?,
                None => endpoints,
            }
        }
        None => Endpoints::twitter()?,
    };
    endpoints.validate()?;

    let mut transport = TransportConfig::builder();
    if let Some(secs) = args.timeout.or(settings.timeout_secs) {
        transport = transport.timeout(Duration::from_secs(secs));
    }

    Ok(Resolved {
        consumer_key,
        consumer_secret,
        endpoints,
        transport: transport.build(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> GlobalArgs {
        GlobalArgs {
            consumer_key: None,
            consumer_secret: None,
            config: None,
            timeout: None,
        }
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let json = r#"{
            "consumer_key": "ck",
            "consumer_secret": "cs",
            "provider": {
                "name": "Example",
                "request_token_url": "https://example.com/oauth/request_token",
                "authorize_url": "https://example.com/oauth/authorize",
                "access_token_url": "https://example.com/oauth/access_token"
            },
            "timeout_secs": 10
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.consumer_key.as_deref(), Some("ck"));
        assert_eq!(settings.timeout_secs, Some(10));
        assert!(settings.provider.as_ref().unwrap().xauth_access_token_url.is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let mut args = args();
        args.consumer_key = Some("flag-key".to_string());
        args.timeout = Some(5);
        let settings = Settings {
            consumer_key: Some("file-key".to_string()),
            consumer_secret: Some("file-secret".to_string()),
            provider: None,
            timeout_secs: Some(60),
        };

        let resolved = resolve(&args, settings).unwrap();
        assert_eq!(resolved.consumer_key, "flag-key");
        assert_eq!(resolved.consumer_secret, "file-secret");
        assert_eq!(resolved.endpoints.name, "Twitter");
        assert_eq!(resolved.transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_timeout() {
        let mut args = args();
        args.consumer_key = Some("k".to_string());
        args.consumer_secret = Some("s".to_string());
        let resolved = resolve(&args, Settings::default()).unwrap();
        assert_eq!(resolved.transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_secret() {
        let mut args = args();
        args.consumer_key = Some("k".to_string());
        let err = resolve(&args, Settings::default()).unwrap_err();
        assert!(err.to_string().contains("consumer secret"));
    }

    #[test]
    fn test_custom_provider() {
        let mut args = args();
        args.consumer_key = Some("k".to_string());
        args.consumer_secret = Some("s".to_string());
        let settings = Settings {
            provider: Some(ProviderSettings {
                name: "Example".to_string(),
                request_token_url: "https://example.com/rt".to_string(),
                authorize_url: "https://example.com/auth".to_string(),
                access_token_url: "https://example.com/at".to_string(),
                xauth_access_token_url: Some("https://example.com/xauth".to_string()),
            }),
            ..Settings::default()
        };
        let resolved = resolve(&args, settings).unwrap();
        assert_eq!(resolved.endpoints.name, "Example");
        assert_eq!(
            resolved.endpoints.xauth_url().unwrap().as_str(),
            "https://example.com/xauth"
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let settings = Settings::load(Path::new("/nonexistent/featherkey/config.json"))
            .await
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_default_path() {
        assert!(Settings::default_path().ends_with("featherkey/config.json"));
    }
}
