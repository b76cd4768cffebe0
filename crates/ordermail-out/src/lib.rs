//! Ordermail-OUT: RenderContext to HTML email
//!
//! This crate renders a normalized, totalled order submission into the
//! HTML email template.
//!
//! # Example
//!
//! ```ignore
//! use ordermail_out::{render_email, templates::TemplateSource};
//!
//! let template = TemplateSource::load("template.html")?;
//! let ctx = ordermail_core::prepare(&body)?;
//! let html = render_email(&template, &ctx)?;
//! ```

pub mod renderer;
pub mod templates;

use ordermail_core::RenderContext;
use renderer::{EmailRenderer, EMAIL_TEMPLATE};
use templates::TemplateSource;
use thiserror::Error;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Template compile failed: {0}")]
    Compile(String),
    #[error("Render failed: {0}")]
    Render(String),
}

/// Compile a template source and render the context with it
pub fn render_email(template: &TemplateSource, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut renderer = EmailRenderer::new();
    renderer.compile(EMAIL_TEMPLATE, &template.source)?;
    let html = renderer.render(EMAIL_TEMPLATE, ctx)?;

    tracing::debug!(
        template = %template.path.display(),
        clients = ctx.clients.len(),
        bytes = html.len(),
        "email rendered"
    );
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_email() {
        let ctx = ordermail_core::prepare(&json!({
            "company": "Acme",
            "clients": { "name": "Dupont", "products": { "quantity": "3", "price_ttc": "2.00" } }
        }))
        .unwrap();
        let template = TemplateSource::new(
            "inline",
            "{{company}}:{{#each clients}}{{name}}={{order_grand_total}}{{/each}}".to_string(),
        );

        let html = render_email(&template, &ctx).unwrap();
        assert_eq!(html, "Acme:Dupont=6.00");
    }

    #[test]
    fn test_render_email_compile_error() {
        let ctx = ordermail_core::prepare(&json!({ "company": "Acme", "clients": {} })).unwrap();
        let template = TemplateSource::new("inline", "{{#if company}}".to_string());
        assert!(matches!(render_email(&template, &ctx), Err(RenderError::Compile(_))));
    }
}
