use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Serialize;

use super::execute;
use super::ProviderError;
use super::Subscribe;
use crate::domain::SubscriberEmail;

pub const DEFAULT_BASE_URL: &str = "https://api.brevo.com";

/// Brevo (formerly Sendinblue), `POST /v3/contacts`. An existing contact is
/// updated and added to the list instead of failing.
pub struct Brevo {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    list_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContact<'a> {
    email: &'a str,
    list_ids: [i64; 1],
    update_enabled: bool,
}

impl Brevo {
    pub fn new(
        http_client: Client,
        base_url: String,
        api_key: Secret<String>,
        list_id: i64,
    ) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            list_id,
        }
    }
}

impl Subscribe for Brevo {
    #[tracing::instrument(
        name = "Creating Brevo contact",
        skip_all,
        fields(list_id = self.list_id)
    )]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/v3/contacts", self.base_url);
        let body = CreateContact {
            email: email.as_ref(),
            list_ids: [self.list_id],
            update_enabled: true,
        };

        let request = self
            .http_client
            .post(&url)
            .header("api-key", self.api_key.expose_secret())
            .header("accept", "application/json")
            .json(&body);

        execute(request).await
    }
}
