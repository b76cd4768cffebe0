//! API Handlers
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use ordermail_core::{decode_urlencoded, FormError};
use ordermail_out::{render_email, templates::TemplateSource, RenderError};
use serde_json::{json, Map, Value};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::metrics::Outcome;
use crate::AppState;

/// How a request body is decoded, from its content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    UrlEncoded,
    Unsupported,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let essence = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .unwrap_or("");

        if essence.eq_ignore_ascii_case("application/json") {
            Self::Json
        } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Self::UrlEncoded
        } else {
            Self::Unsupported
        }
    }
}

/// Submitted form body decoded into loose JSON.
///
/// Bodies of any other content type decode to an empty object, which the
/// normalizer then rejects as missing data.
#[derive(Debug, Clone)]
pub struct SubmittedForm(pub Value);

impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::from_headers(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let value = match kind {
            BodyKind::Json if bytes.iter().all(u8::is_ascii_whitespace) => Value::Object(Map::new()),
            BodyKind::Json => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::from(FormError::MalformedBody(e.to_string())).into_response())?,
            BodyKind::UrlEncoded => decode_urlencoded(&bytes),
            BodyKind::Unsupported => Value::Object(Map::new()),
        };
        Ok(SubmittedForm(value))
    }
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    SubmittedForm(body): SubmittedForm,
) -> Result<Html<String>, ApiError> {
    let result = build_email(&state.config, &body).await;

    state.metrics.record(match &result {
        Ok(_) => Outcome::Ok,
        Err(ApiError::Form(_)) => Outcome::Invalid,
        Err(ApiError::Render(_)) => Outcome::Error,
    });

    result.map(Html)
}

/// Template read, then validation, then compile and render.
async fn build_email(config: &ServerConfig, body: &Value) -> Result<String, ApiError> {
    let path = config.template_path.clone();
    let template = tokio::task::spawn_blocking(move || TemplateSource::load(path))
        .await
        .map_err(|e| RenderError::Template(e.to_string()))??;

    let ctx = ordermail_core::prepare(body)?;
    let html = render_email(&template, &ctx)?;

    tracing::info!(company = %ctx.company, clients = ctx.clients.len(), "email generated");
    Ok(html)
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    state.metrics.encode().map_err(|e| {
        tracing::error!(error = %e, "failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_body_kind() {
        assert_eq!(BodyKind::from_headers(&headers("application/json")), BodyKind::Json);
        assert_eq!(
            BodyKind::from_headers(&headers("Application/JSON; charset=utf-8")),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::from_headers(&headers("application/x-www-form-urlencoded")),
            BodyKind::UrlEncoded
        );
        assert_eq!(BodyKind::from_headers(&headers("text/plain")), BodyKind::Unsupported);
        assert_eq!(BodyKind::from_headers(&HeaderMap::new()), BodyKind::Unsupported);
    }
}
