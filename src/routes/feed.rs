use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;

use crate::configuration::FeedSettings;
use crate::feed::build_feed;
use crate::feed::load_items;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for FeedError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for FeedError {
    fn status_code(&self) -> StatusCode { StatusCode::INTERNAL_SERVER_ERROR }
}

/// `GET /rss.xml`
///
/// Rebuilt from the content dir on every request, so new articles show up
/// without a restart.
#[tracing::instrument(name = "Building feed", skip_all)]
pub async fn rss(settings: web::Data<FeedSettings>) -> Result<HttpResponse, FeedError> {
    let items = load_items(&settings.content_dir).await.map_err(|e| {
        tracing::error!(error.cause_chain = ?e, "Could not load articles");
        e
    })?;
    let xml = build_feed(&settings, items)?;

    Ok(HttpResponse::Ok()
        .content_type("application/rss+xml; charset=utf-8")
        .body(xml))
}
