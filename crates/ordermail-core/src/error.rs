//! Unified Error Model
use thiserror::Error;

/// Message returned to the submitter when `company` or `clients` is missing.
pub const MISSING_FORM_DATA: &str = "Missing required form data.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required form data.")]
    MissingFormData,

    #[error("BODY/{0}")]
    MalformedBody(String),
}
