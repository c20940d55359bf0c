mod feed;
mod health_check;
mod subscriptions;
pub use feed::*;
pub use health_check::*;
pub use subscriptions::*;
