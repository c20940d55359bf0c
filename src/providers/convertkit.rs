use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Serialize;

use super::execute;
use super::ProviderError;
use super::Subscribe;
use crate::domain::SubscriberEmail;

pub const DEFAULT_BASE_URL: &str = "https://api.convertkit.com";

/// ConvertKit v3, `POST /v3/forms/{form_id}/subscribe`. The API key travels
/// in the body; there is no auth header.
pub struct ConvertKit {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    form_id: String,
}

#[derive(Serialize)]
struct FormSubscribe<'a> {
    api_key: &'a str,
    email: &'a str,
}

impl ConvertKit {
    pub fn new(
        http_client: Client,
        base_url: String,
        api_key: Secret<String>,
        form_id: String,
    ) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            form_id,
        }
    }
}

impl Subscribe for ConvertKit {
    #[tracing::instrument(
        name = "Subscribing to ConvertKit form",
        skip_all,
        fields(form_id = %self.form_id)
    )]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/v3/forms/{}/subscribe", self.base_url, self.form_id);
        let body = FormSubscribe {
            api_key: self.api_key.expose_secret(),
            email: email.as_ref(),
        };
        execute(self.http_client.post(&url).json(&body)).await
    }
}
