use serde::Deserialize;
use serde::Serialize;

pub const SUBSCRIBED: &str = "Successfully subscribed!";
pub const EMAIL_REQUIRED: &str = "Valid email is required";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Body of `POST /api/subscribe`, either form-encoded or JSON. Unknown
/// fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// What the caller gets back. Only ever carries one of the fixed messages
/// above; provider detail never ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    pub success: bool,
    pub message: String,
}

impl SubscriptionResult {
    pub fn subscribed() -> Self {
        Self {
            success: true,
            message: SUBSCRIBED.to_string(),
        }
    }

    pub fn email_required() -> Self {
        Self {
            success: false,
            message: EMAIL_REQUIRED.to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            message: GENERIC_FAILURE.to_string(),
        }
    }
}
