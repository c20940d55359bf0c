use std::fmt::Debug;

use once_cell::sync::OnceCell;
use reqwest::Client;

use crate::configuration::SubscriptionSettings;
use crate::domain::SubscriberEmail;
use crate::domain::SubscriptionRequest;
use crate::domain::SubscriptionResult;
use crate::providers::Provider;
use crate::providers::ProviderError;
use crate::providers::Subscribe;
use crate::registry;
use crate::registry::ConfigurationError;
use crate::utils::error_chain_fmt;

/// Everything that can go wrong while handling a signup. Only
/// `public_result` ever reaches the caller; the rest is for the logs.
#[derive(thiserror::Error)]
pub enum GatewayError {
    /// Missing or malformed email, or a body we could not parse.
    #[error("{0}")]
    InvalidInput(String),
    #[error("Provider declined the subscription")]
    ProviderRejection(#[source] ProviderError),
    #[error("Could not talk to the provider")]
    TransportFault(#[source] ProviderError),
    #[error("Subscription provider is misconfigured")]
    Configuration(#[from] ConfigurationError),
}

impl Debug for GatewayError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ProviderError> for GatewayError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Rejected { .. } => Self::ProviderRejection(e),
            ProviderError::Transport(_) => Self::TransportFault(e),
        }
    }
}

impl GatewayError {
    /// What the caller is told. Fixed messages only.
    pub fn public_result(&self) -> SubscriptionResult {
        match self {
            Self::InvalidInput(_) => SubscriptionResult::email_required(),
            _ => SubscriptionResult::failed(),
        }
    }
}

/// Validator -> registry -> adapter, once per request.
///
/// Holds the process-wide subscription settings (read-only) and the shared
/// HTTP client. The provider is resolved on first use and then kept; a
/// configuration fault is not cached, so every request reports it.
pub struct SubscriptionGateway {
    settings: SubscriptionSettings,
    http_client: Client,
    provider: OnceCell<Provider>,
}

impl SubscriptionGateway {
    pub fn new(
        settings: SubscriptionSettings,
        http_client: Client,
    ) -> Self {
        Self {
            settings,
            http_client,
            provider: OnceCell::new(),
        }
    }

    /// The configured provider, resolving it if this is the first call.
    pub fn provider(&self) -> Result<&Provider, ConfigurationError> {
        self.provider
            .get_or_try_init(|| registry::resolve(&self.settings, &self.http_client))
    }

    #[tracing::instrument(
        name = "Handling subscription request",
        skip_all,
        fields(
            service = %self.settings.service,
            subscriber_email = tracing::field::Empty,
        )
    )]
    pub async fn handle(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionResult, GatewayError> {
        let outcome = self.try_handle(request).await;

        match &outcome {
            Ok(_) => tracing::info!("Subscription accepted"),
            Err(e @ GatewayError::InvalidInput(_)) => {
                tracing::warn!(error.message = %e, "Rejected subscription request")
            }
            Err(e) => tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Subscription failed"
            ),
        }

        outcome
    }

    async fn try_handle(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionResult, GatewayError> {
        let email = request
            .email
            .ok_or_else(|| GatewayError::InvalidInput("No email field".to_string()))?;
        let email = SubscriberEmail::parse(email).map_err(GatewayError::InvalidInput)?;

        tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

        let provider = self.provider()?;
        provider.subscribe(&email).await?;

        Ok(SubscriptionResult::subscribed())
    }
}
