use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;
use tower_sessions::cookie::Key;
use validator::{Validate, ValidationError};

/// Minimum cookie secret length; the signing key needs 64 bytes of material.
pub const MIN_COOKIE_SECRET_BYTES: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("cookie secret cannot be used as a signing key: {0}")]
    SigningKey(String),
    #[error("failed to determine the current directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize, Clone, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub provider: ProviderSettings,
    #[validate(nested)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    #[validate(length(min = 1))]
    pub static_path: String,
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1))]
    pub log_level: String,
    /// OTLP collector, e.g. `http://tempo:4317`. Spans are only exported when set.
    #[serde(default)]
    #[validate(url)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OAuth client registration and data API location.
#[derive(Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_client_secret"))]
pub struct ProviderSettings {
    #[validate(length(min = 1))]
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// Must match the redirect URI registered with the provider.
    #[validate(url)]
    pub redirect_uri: String,
    /// Base URI for `/authorize/`, `/token/` and the `/1/...` data endpoints.
    #[validate(url)]
    pub api_uri: String,
}

impl ProviderSettings {
    /// `api_uri` joined with `path`, tolerating a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_uri.trim_end_matches('/'), path)
    }
}

#[derive(Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_cookie_secret"))]
pub struct SessionSettings {
    #[validate(length(min = 1))]
    pub cookie_name: String,
    /// Session key the access token is stored under.
    #[validate(length(min = 1))]
    pub access_token_key: String,
    pub cookie_secret: Secret<String>,
    /// Set in production behind HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
}

impl SessionSettings {
    pub fn signing_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.cookie_secret.expose_secret().as_bytes())
            .map_err(|e| ConfigError::SigningKey(e.to_string()))
    }
}

// Struct-level: field validators require `Serialize`, which `Secret<String>` is not.
fn validate_client_secret(provider: &ProviderSettings) -> Result<(), ValidationError> {
    if provider.client_secret.expose_secret().trim().is_empty() {
        return Err(ValidationError::new("empty_secret"));
    }
    Ok(())
}

fn validate_cookie_secret(session: &SessionSettings) -> Result<(), ValidationError> {
    if session.cookie_secret.expose_secret().len() < MIN_COOKIE_SECRET_BYTES {
        return Err(ValidationError::new("cookie_secret_too_short"));
    }
    Ok(())
}

impl Settings {
    /// Deserialize and validate an already assembled configuration.
    pub fn from_config(config: ::config::Config) -> Result<Self, ConfigError> {
        let settings = config.try_deserialize::<Settings>()?;
        settings.validate()?;
        settings.session.signing_key()?;
        Ok(settings)
    }
}

/// Load `config/base.yaml` (optional) overlaid with `APP_*` environment
/// variables, e.g. `APP_PROVIDER__CLIENT_ID`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()?;

    let configuration_directory: PathBuf = if base_path.ends_with("bone-strength") {
        base_path.join("config")
    } else {
        base_path.join("bone-strength").join("config")
    };

    let settings = ::config::Config::builder()
        .add_source(
            ::config::File::from(configuration_directory.join("base.yaml")).required(false),
        )
        .add_source(
            ::config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Settings::from_config(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn builder() -> ::config::ConfigBuilder<::config::builder::DefaultState> {
        ::config::Config::builder()
            .set_override("server.host", "127.0.0.1")
            .unwrap()
            .set_override("server.port", 5000)
            .unwrap()
            .set_override("server.static_path", "static")
            .unwrap()
            .set_override("provider.client_id", "client")
            .unwrap()
            .set_override("provider.client_secret", "shh")
            .unwrap()
            .set_override("provider.redirect_uri", "http://localhost:5000/receive_code/")
            .unwrap()
            .set_override("provider.api_uri", "https://api.example.com/")
            .unwrap()
            .set_override("session.cookie_name", "bone_strength_session")
            .unwrap()
            .set_override("session.access_token_key", "access_token")
            .unwrap()
            .set_override("session.cookie_secret", SECRET)
            .unwrap()
    }

    #[test]
    fn loads_complete_configuration() {
        let settings = Settings::from_config(builder().build().unwrap()).unwrap();

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.log_level, "info");
        assert!(settings.server.otlp_endpoint.is_none());
        assert!(!settings.session.secure_cookie);
        assert_eq!(
            settings.provider.endpoint("/token/"),
            "https://api.example.com/token/"
        );
    }

    #[test]
    fn missing_required_values_fail() {
        let config = ::config::Config::builder()
            .set_override("server.host", "127.0.0.1")
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            Settings::from_config(config),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn empty_client_id_fails_validation() {
        let config = builder()
            .set_override("provider.client_id", "")
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            Settings::from_config(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn short_cookie_secret_fails_validation() {
        let config = builder()
            .set_override("session.cookie_secret", "too-short")
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            Settings::from_config(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn blank_client_secret_fails_validation() {
        let config = builder()
            .set_override("provider.client_secret", "   ")
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            Settings::from_config(config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn non_url_redirect_fails_validation() {
        let config = builder()
            .set_override("provider.redirect_uri", "not a url")
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            Settings::from_config(config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
