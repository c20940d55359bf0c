use reqwest::Client;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde_json::json;

use super::execute;
use super::ProviderError;
use super::Subscribe;
use crate::domain::SubscriberEmail;

pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com";

/// Pinned API revision; Klaviyo rejects requests without one.
const REVISION: &str = "2024-10-15";

/// Klaviyo, `POST /api/profile-subscription-bulk-create-jobs/` with a single
/// profile. The job is accepted asynchronously (202).
pub struct Klaviyo {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    list_id: String,
}

impl Klaviyo {
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

    fn body(
        &self,
        email: &SubscriberEmail,
    ) -> serde_json::Value {
        json!({
            "data": {
                "type": "profile-subscription-bulk-create-job",
                "attributes": {
                    "profiles": {
                        "data": [{
                            "type": "profile",
                            "attributes": {
                                "email": email.as_ref(),
                                "subscriptions": {
                                    "email": {
                                        "marketing": { "consent": "SUBSCRIBED" }
                                    }
                                }
                            }
                        }]
                    }
                },
                "relationships": {
                    "list": {
                        "data": { "type": "list", "id": self.list_id }
                    }
                }
            }
        })
    }
}

impl Subscribe for Klaviyo {
    #[tracing::instrument(
        name = "Subscribing profile to Klaviyo list",
        skip_all,
        fields(list_id = %self.list_id)
    )]
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        let url = format!(
            "{}/api/profile-subscription-bulk-create-jobs/",
            self.base_url
        );

        // JSON:API wants its own media type; `.json()` would set plain
        // application/json, so the body is serialized by hand
        let request = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Klaviyo-API-Key {}", self.api_key.expose_secret()),
            )
            .header("revision", REVISION)
            .header("accept", "application/vnd.api+json")
            .header("content-type", "application/vnd.api+json")
            .body(self.body(email).to_string());

        execute(request).await
    }
}
