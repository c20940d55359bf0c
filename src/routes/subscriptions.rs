use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::ResponseError;

use crate::domain::SubscriptionRequest;
use crate::gateway::GatewayError;
use crate::gateway::SubscriptionGateway;

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // the provider answered; from the caller's side this is a
            // graceful "no"
            Self::ProviderRejection(_) => StatusCode::OK,
            Self::TransportFault(_) | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.public_result())
    }
}

/// Accepts `application/json`, `multipart/form-data` and
/// `application/x-www-form-urlencoded` (the default for anything else, as
/// HTML forms do not always send a content type).
async fn parse_body(
    req: &HttpRequest,
    body: web::Bytes,
) -> Result<SubscriptionRequest, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubscriptionRequest::default());
    }

    let content_type = req.content_type();
    let parsed: Result<SubscriptionRequest, String> =
        if content_type.eq_ignore_ascii_case("application/json") {
            serde_json::from_slice(&body).map_err(|e| e.to_string())
        } else if content_type.eq_ignore_ascii_case("multipart/form-data") {
            parse_multipart(req, body).await
        } else {
            serde_urlencoded::from_bytes(&body).map_err(|e| e.to_string())
        };

    parsed.map_err(|e| GatewayError::InvalidInput(format!("Malformed body: {e}")))
}

/// What `fetch(url, { body: new FormData(form) })` sends. Only the `email`
/// field is read; files and other fields are skipped.
async fn parse_multipart(
    req: &HttpRequest,
    body: web::Bytes,
) -> Result<SubscriptionRequest, String> {
    // the full header, since the boundary is a parameter
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let boundary = multer::parse_boundary(content_type).map_err(|e| e.to_string())?;

    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() == Some("email") {
            let email = field.text().await.map_err(|e| e.to_string())?;
            return Ok(SubscriptionRequest { email: Some(email) });
        }
    }

    Ok(SubscriptionRequest::default())
}

/// `POST /api/subscribe`
///
/// Responds with `{"success": bool, "message": string}` in every case.
///
/// ```sh
///     curl --data 'email=john%40foo.com' http://127.0.0.1:8000/api/subscribe
///     curl --json '{"email": "john@foo.com"}' http://127.0.0.1:8000/api/subscribe
///     curl --form 'email=john@foo.com' http://127.0.0.1:8000/api/subscribe
/// ```
#[tracing::instrument(name = "Subscribe endpoint", skip_all)]
pub async fn subscribe(
    req: HttpRequest,
    body: web::Bytes,
    gateway: web::Data<SubscriptionGateway>,
) -> Result<HttpResponse, GatewayError> {
    let request = match parse_body(&req, body).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error.message = %e, "Could not parse subscription body");
            return Err(e);
        }
    };

    let result = gateway.handle(request).await?;
    Ok(HttpResponse::Ok().json(result))
}
