use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Serialize;

use super::execute;
use super::ProviderError;
use super::Subscribe;
use crate::domain::SubscriberEmail;

/// Mailchimp Marketing API, `POST /3.0/lists/{list_id}/members`.
pub struct Mailchimp {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    list_id: String,
}

#[derive(Serialize)]
struct AddListMember<'a> {
    email_address: &'a str,
    status: &'a str,
}

impl Mailchimp {
    /// `base_url` is normally `https://{server_prefix}.api.mailchimp.com`
    pub fn new(
        http_client: Client,
        base_url: String,
        api_key: Secret<String>,
        list_id: String,
    ) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            list_id,
        }
    }

    pub fn default_base_url(server_prefix: &str) -> String {
        format!("https://{server_prefix}.api.mailchimp.com")
    }
}

impl Subscribe for Mailchimp {
    #[tracing::instrument(
        name = "Adding list member to Mailchimp",
        skip_all,
        fields(list_id = %self.list_id)
    )]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/3.0/lists/{}/members", self.base_url, self.list_id);
        let body = AddListMember {
            email_address: email.as_ref(),
            status: "subscribed",
        };

        // any username works; the key is the password
        let request = self
            .http_client
            .post(&url)
            .basic_auth("anystring", Some(self.api_key.expose_secret()))
            .json(&body);

        execute(request).await
    }
}
