use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::subscription_client::SubscriptionClient;

/// Global configuration, loaded from configuration/*.yaml. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub provider: ProviderSettings,
}

/// Server configuration
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    /// Port for the server
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Subscription provider (Buttondown) configuration
#[derive(Deserialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,

    /// Bearer secret for the provider. Left as `None` when unconfigured; the
    /// webhook reports the absence per-request instead of refusing to start,
    /// so the rest of the site glue keeps working without it.
    pub authorization_token: Option<Secret<String>>,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    /// Build the outbound client described by this config
    pub fn client(self) -> SubscriptionClient {
        let timeout = self.timeout();
        SubscriptionClient::new(self.base_url, self.authorization_token, timeout)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )?;
        Ok(())
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// Sources, later wins: `base.yaml`, `{env}.yaml` (selected by
/// `APP_ENVIRONMENT`), `APP_*` env vars (e.g. `APP_APPLICATION__PORT=5001` ->
/// `Settings.application.port`). Finally, `EMAIL_TOKEN` -- the name the
/// hosting platform injects -- overrides the provider token when present.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .expect("could not get current dir")
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .expect("could not initiate Environment struct");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, `serde-aux` is required to parse other
            // types
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut settings = settings.try_deserialize::<Settings>()?;

    if let Ok(token) = env::var("EMAIL_TOKEN") {
        settings.provider.authorization_token = Some(Secret::new(token));
    }

    Ok(settings)
}
