//! Maps the configured `service` onto a ready-to-use `Provider`.
//!
//! This is the only place that looks at the provider tag or at credentials;
//! each adapter receives just its own section.

use std::fmt::Debug;
use std::fmt::Display;

use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;

use crate::configuration::SubscriptionSettings;
use crate::providers::brevo;
use crate::providers::convertkit;
use crate::providers::klaviyo;
use crate::providers::Brevo;
use crate::providers::ConvertKit;
use crate::providers::Klaviyo;
use crate::providers::Mailchimp;
use crate::providers::Netlify;
use crate::providers::Provider;
use crate::utils::error_chain_fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderId {
    Netlify,
    Mailchimp,
    ConvertKit,
    Klaviyo,
    Brevo,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Netlify,
        ProviderId::Mailchimp,
        ProviderId::ConvertKit,
        ProviderId::Klaviyo,
        ProviderId::Brevo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Netlify => "netlify",
            ProviderId::Mailchimp => "mailchimp",
            ProviderId::ConvertKit => "convertkit",
            ProviderId::Klaviyo => "klaviyo",
            ProviderId::Brevo => "brevo",
        }
    }

    /// Names of the credentials (under `subscription.<id>`) that must be set.
    #[cfg(test)]
    fn required_credentials(&self) -> &'static [&'static str] {
        match self {
            ProviderId::Netlify => &[],
            ProviderId::Mailchimp => &["api_key", "server_prefix", "list_id"],
            ProviderId::ConvertKit => &["api_key", "form_id"],
            ProviderId::Klaviyo => &["api_key", "list_id"],
            ProviderId::Brevo => &["api_key", "list_id"],
        }
    }
}

impl Display for ProviderId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = ConfigurationError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| ConfigurationError::UnknownProvider(value.to_string()))
    }
}

/// The configured provider cannot be used. Never shown to callers.
#[derive(thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "{0:?} is not a supported subscription service. Use one of: netlify, mailchimp, \
         convertkit, klaviyo, brevo"
    )]
    UnknownProvider(String),
    #[error("subscription.{provider}.{field} is not set")]
    MissingCredential {
        provider: ProviderId,
        field: &'static str,
    },
    #[error("subscription.{provider}.{field} is invalid: {reason}")]
    InvalidCredential {
        provider: ProviderId,
        field: &'static str,
        reason: String,
    },
}

impl Debug for ConfigurationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Build the adapter selected by `settings.service`, handing it the shared
/// `http_client` and its own credentials.
pub fn resolve(
    settings: &SubscriptionSettings,
    http_client: &Client,
) -> Result<Provider, ConfigurationError> {
    let id = ProviderId::try_from(settings.service.as_str())?;
    let http_client = http_client.clone();

    let provider = match id {
        ProviderId::Netlify => Provider::Netlify(Netlify),

        ProviderId::Mailchimp => {
            let s = &settings.mailchimp;
            let api_key = require_secret(id, "api_key", &s.api_key)?;
            let server_prefix = require(id, "server_prefix", &s.server_prefix)?;
            let list_id = require(id, "list_id", &s.list_id)?;
            let base_url = base_url_or(&s.base_url, &Mailchimp::default_base_url(&server_prefix));
            Provider::Mailchimp(Mailchimp::new(http_client, base_url, api_key, list_id))
        }

        ProviderId::ConvertKit => {
            let s = &settings.convertkit;
            let api_key = require_secret(id, "api_key", &s.api_key)?;
            let form_id = require(id, "form_id", &s.form_id)?;
            let base_url = base_url_or(&s.base_url, convertkit::DEFAULT_BASE_URL);
            Provider::ConvertKit(ConvertKit::new(http_client, base_url, api_key, form_id))
        }

        ProviderId::Klaviyo => {
            let s = &settings.klaviyo;
            let api_key = require_secret(id, "api_key", &s.api_key)?;
            let list_id = require(id, "list_id", &s.list_id)?;
            let base_url = base_url_or(&s.base_url, klaviyo::DEFAULT_BASE_URL);
            Provider::Klaviyo(Klaviyo::new(http_client, base_url, api_key, list_id))
        }

        ProviderId::Brevo => {
            let s = &settings.brevo;
            let api_key = require_secret(id, "api_key", &s.api_key)?;
            let list_id = require(id, "list_id", &s.list_id)?;
            let list_id = list_id
                .parse::<i64>()
                .map_err(|e| ConfigurationError::InvalidCredential {
                    provider: id,
                    field: "list_id",
                    reason: e.to_string(),
                })?;
            let base_url = base_url_or(&s.base_url, brevo::DEFAULT_BASE_URL);
            Provider::Brevo(Brevo::new(http_client, base_url, api_key, list_id))
        }
    };

    Ok(provider)
}

/// Blank counts as missing; env vars are easily set to "".
fn require(
    provider: ProviderId,
    field: &'static str,
    value: &Option<String>,
) -> Result<String, ConfigurationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigurationError::MissingCredential { provider, field })
}

fn require_secret(
    provider: ProviderId,
    field: &'static str,
    value: &Option<Secret<String>>,
) -> Result<Secret<String>, ConfigurationError> {
    match value {
        Some(secret) if !secret.expose_secret().trim().is_empty() => Ok(secret.clone()),
        _ => Err(ConfigurationError::MissingCredential { provider, field }),
    }
}

fn base_url_or(
    configured: &Option<String>,
    default: &str,
) -> String {
    configured
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
