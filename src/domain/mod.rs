mod subscriber_email;
mod subscription;
pub use subscriber_email::is_valid_email;
pub use subscriber_email::SubscriberEmail;
pub use subscription::SubscriptionRequest;
pub use subscription::SubscriptionResult;
pub use subscription::EMAIL_REQUIRED;
pub use subscription::GENERIC_FAILURE;
pub use subscription::SUBSCRIBED;
