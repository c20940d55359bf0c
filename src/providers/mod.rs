//! Audience backends. Each adapter turns a checked email address into one
//! vendor-specific HTTP call (or, for Netlify, into nothing at all) and
//! reports the outcome. No adapter retries or queues; one attempt per
//! request.

pub mod brevo;
pub mod convertkit;
pub mod klaviyo;
pub mod mailchimp;
pub mod netlify;

use std::fmt::Debug;

pub use brevo::Brevo;
pub use convertkit::ConvertKit;
pub use klaviyo::Klaviyo;
pub use mailchimp::Mailchimp;
pub use netlify::Netlify;
use reqwest::RequestBuilder;
use reqwest::StatusCode;

use crate::domain::SubscriberEmail;
use crate::registry::ProviderId;
use crate::utils::error_chain_fmt;

/// Why a subscribe call did not succeed. `Ok(())` is the third outcome.
#[derive(thiserror::Error)]
pub enum ProviderError {
    /// The provider answered, but not with a 2xx.
    #[error("provider responded with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    /// No answer at all: DNS, connect, timeout, reset...
    #[error("could not reach provider")]
    Transport(#[source] reqwest::Error),
}

impl Debug for ProviderError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The one capability every backend offers.
// all implementors live in this crate and are only awaited in place, so the
// missing `Send` bound on the returned future is not a concern
#[allow(async_fn_in_trait)]
pub trait Subscribe {
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError>;
}

/// The configured backend, as resolved by `registry::resolve`.
pub enum Provider {
    Mailchimp(Mailchimp),
    ConvertKit(ConvertKit),
    Klaviyo(Klaviyo),
    Brevo(Brevo),
    Netlify(Netlify),
}

impl Debug for Provider {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_tuple("Provider").field(&self.id()).finish()
    }
}

impl Provider {
    pub fn id(&self) -> ProviderId {
        match self {
            Provider::Mailchimp(_) => ProviderId::Mailchimp,
            Provider::ConvertKit(_) => ProviderId::ConvertKit,
            Provider::Klaviyo(_) => ProviderId::Klaviyo,
            Provider::Brevo(_) => ProviderId::Brevo,
            Provider::Netlify(_) => ProviderId::Netlify,
        }
    }
}

impl Subscribe for Provider {
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        match self {
            Provider::Mailchimp(p) => p.subscribe(email).await,
            Provider::ConvertKit(p) => p.subscribe(email).await,
            Provider::Klaviyo(p) => p.subscribe(email).await,
            Provider::Brevo(p) => p.subscribe(email).await,
            Provider::Netlify(p) => p.subscribe(email).await,
        }
    }
}

/// Send a prepared request and map the response onto `ProviderError`. Shared
/// by all network adapters so that they agree on what counts as success.
async fn execute(request: RequestBuilder) -> Result<(), ProviderError> {
    let response = request.send().await.map_err(ProviderError::Transport)?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    // the body is only for the operator log; losing it is not worth an error
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Rejected { status, body })
}
