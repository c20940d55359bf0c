use actix_web::HttpResponse;

/// `GET /health_check`
///
/// Empty 200; the platform's liveness probe. Does not touch any provider.
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
