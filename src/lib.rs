//! Outward-facing integration layer of a small content site: newsletter
//! signups forwarded to a configurable audience provider, and the RSS feed
//! of published articles.

pub mod configuration;
pub mod domain;
pub mod feed;
pub mod gateway;
pub mod providers;
pub mod registry;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
