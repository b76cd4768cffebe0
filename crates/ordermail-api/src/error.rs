//! Request errors and their HTTP mapping.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ordermail_core::{FormError, MISSING_FORM_DATA};
use ordermail_out::RenderError;
use thiserror::Error;

pub const GENERATION_FAILED: &str = "An error occurred while generating the email.";
pub const MALFORMED_BODY: &str = "Malformed request body.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Form(_) => StatusCode::BAD_REQUEST,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed text sent to the caller; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Form(FormError::MissingFormData) => MISSING_FORM_DATA,
            Self::Form(FormError::MalformedBody(_)) => MALFORMED_BODY,
            Self::Render(_) => GENERATION_FAILED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Form(err) => tracing::debug!(error = %err, "submission rejected"),
            Self::Render(err) => tracing::error!(error = %err, "Error generating email"),
        }
        (self.status(), self.public_message()).into_response()
    }
}
