use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Global configuration, loaded from `configuration/*.yaml` and the
/// environment. See `get_configuration`.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscription: SubscriptionSettings,
    pub feed: FeedSettings,
}

/// Server configuration
#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Which audience backend receives signups, and the credentials of every
/// backend. Only the section matching `service` is ever read.
#[derive(Clone, Debug, Deserialize)]
pub struct SubscriptionSettings {
    /// One of `netlify`, `mailchimp`, `convertkit`, `klaviyo`, `brevo`. Kept
    /// as a raw string so that an unknown value is reported by the registry
    /// (at first use), not by the config loader.
    pub service: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,

    /// Refuse to start when the configured provider cannot be resolved.
    #[serde(default)]
    pub validate_on_startup: bool,

    #[serde(default)]
    pub mailchimp: MailchimpSettings,
    #[serde(default)]
    pub convertkit: ConvertKitSettings,
    #[serde(default)]
    pub klaviyo: KlaviyoSettings,
    #[serde(default)]
    pub brevo: BrevoSettings,
}

impl SubscriptionSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }
}

// every credential is optional at load time; missing ones are a
// `ConfigurationError` raised by the registry

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MailchimpSettings {
    pub api_key: Option<Secret<String>>,
    /// Data center, e.g. `us1`
    pub server_prefix: Option<String>,
    pub list_id: Option<String>,
    /// Replaces `https://{server_prefix}.api.mailchimp.com`
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConvertKitSettings {
    pub api_key: Option<Secret<String>>,
    pub form_id: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KlaviyoSettings {
    pub api_key: Option<Secret<String>>,
    pub list_id: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BrevoSettings {
    pub api_key: Option<Secret<String>>,
    pub list_id: Option<String>,
    pub base_url: Option<String>,
}

/// Channel metadata of `/rss.xml`, and where the articles live.
#[derive(Clone, Debug, Deserialize)]
pub struct FeedSettings {
    pub title: String,
    pub description: String,
    /// Public origin of the site, without trailing slash
    pub site: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub content_dir: PathBuf,
}

fn default_language() -> String { "en-us".to_string() }

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
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!(
                "{e} is not a supported environment. Use either 'local' or 'production'"
            )),
        }
    }
}

/// Vendor-named variables, as documented by each provider's own setup
/// guides. They take precedence over everything else.
const VENDOR_VARIABLES: [(&str, &str); 9] = [
    ("MAILCHIMP_API_KEY", "subscription.mailchimp.api_key"),
    ("MAILCHIMP_SERVER_PREFIX", "subscription.mailchimp.server_prefix"),
    ("MAILCHIMP_LIST_ID", "subscription.mailchimp.list_id"),
    ("CONVERTKIT_API_KEY", "subscription.convertkit.api_key"),
    ("CONVERTKIT_FORM_ID", "subscription.convertkit.form_id"),
    ("KLAVIYO_API_KEY", "subscription.klaviyo.api_key"),
    ("KLAVIYO_LIST_ID", "subscription.klaviyo.list_id"),
    ("BREVO_API_KEY", "subscription.brevo.api_key"),
    ("BREVO_LIST_ID", "subscription.brevo.list_id"),
];

/// Load yaml configuration files at `<project_root>/configuration`, then
/// overlay the environment.
///
/// `APP_SUBSCRIPTION__SERVICE=mailchimp` -> `Settings.subscription.service`
///
/// Missing provider credentials do not fail here; see
/// `registry::resolve`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let mut builder = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    for (var, key) in VENDOR_VARIABLES {
        builder = builder.set_override_option(key, env::var(var).ok())?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
