//! Ordermail Core: form normalization and order totals
//!
//! Turns a loosely-shaped order form submission into a `RenderContext`
//! ready for the email template.
//!
//! # Example
//!
//! ```
//! use ordermail_core::prepare;
//! use serde_json::json;
//!
//! let ctx = prepare(&json!({
//!     "company": "Acme",
//!     "clients": { "products": { "quantity": "3", "price_ttc": "2.00" } }
//! }))
//! .unwrap();
//! assert_eq!(ctx.clients[0].order_grand_total.as_deref(), Some("6.00"));
//! ```

pub mod data_model;
pub mod error;
pub mod form;
pub mod normalizer;
pub mod numeric;
pub mod totalizer;

pub use data_model::{ClientRecord, OneOrMany, ProductRecord, RenderContext};
pub use error::{FormError, MISSING_FORM_DATA};
pub use form::decode_urlencoded;
pub use normalizer::normalize;
pub use totalizer::{compute_total, totalize};

/// Normalize a decoded submission and compute every client's total.
pub fn prepare(raw: &serde_json::Value) -> Result<RenderContext, FormError> {
    let mut ctx = normalize(raw)?;
    totalize(&mut ctx);
    Ok(ctx)
}
