use super::ProviderError;
use super::Subscribe;
use crate::domain::SubscriberEmail;

/// Pass-through for sites whose hosting platform collects the form itself.
///
/// Makes no outbound call and always succeeds: the address is validated and
/// logged here, and delivery to a list happens out of band (or not at all).
/// `startup` warns about this whenever it is the configured provider.
#[derive(Default)]
pub struct Netlify;

impl Subscribe for Netlify {
    async fn subscribe(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), ProviderError> {
        tracing::info!(
            subscriber_email = %email,
            "Accepted subscription without forwarding it (netlify pass-through)"
        );
        Ok(())
    }
}
