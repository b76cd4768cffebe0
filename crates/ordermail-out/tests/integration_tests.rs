//! Integration tests for ordermail-out with the real template file.
//!
//! These verify the full path from a submission to the HTML email using the
//! template.html shipped at the workspace root.

use ordermail_core::{prepare, RenderContext};
use ordermail_out::{render_email, templates::TemplateSource, RenderError};
use serde_json::json;

/// Path to the template relative to the workspace root
const TEMPLATE_PATH: &str = "template.html";

/// Get the absolute path to the template
fn template_path() -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(TEMPLATE_PATH).to_string_lossy().to_string()
}

fn render(ctx: &RenderContext) -> String {
    let template = TemplateSource::load(template_path()).unwrap();
    render_email(&template, ctx).unwrap()
}

// =============================================================================
// Email template
// =============================================================================

#[test]
fn test_single_client_email() {
    let ctx = prepare(&json!({
        "company": "Acme",
        "clients": {
            "client_name": "Dupont",
            "products": { "designation": "Stylo", "quantity": "3", "price_ttc": "2" },
            "order_livr": "0",
            "order_tbr": "0"
        }
    }))
    .unwrap();

    let html = render(&ctx);

    assert!(html.contains("Acme"));
    assert!(html.contains("Dupont"));
    assert!(html.contains("Stylo"));
    assert!(html.contains("2.00"));
    assert!(html.contains("6.00"));
    assert!(html.contains("Offerte"));
}

#[test]
fn test_multiple_clients_email() {
    let ctx = prepare(&json!({
        "company": "Acme",
        "tableBackground": "#123456",
        "tableColor": "#abcdef",
        "clients": [
            {
                "client_name": "Dupont",
                "products": [
                    { "designation": "Stylo", "quantity": "2", "price_ttc": "10.00" },
                    { "designation": "Cahier", "quantity": "1", "price_ttc": "5.5" }
                ],
                "order_livr": "3",
                "order_tbr": "1"
            },
            { "client_name": "Martin", "order_livr": "7" }
        ]
    }))
    .unwrap();

    let html = render(&ctx);

    assert!(html.contains("background:#123456"));
    assert!(html.contains("color:#abcdef"));
    assert!(html.contains("29.50"));
    assert!(html.contains("3.00"));
    assert!(html.contains("Cahier"));
    assert!(html.contains("Martin"));
    assert!(html.contains("7.00"));
    assert!(html.contains("Aucun produit"));
}

#[test]
fn test_default_table_colors() {
    let ctx = prepare(&json!({ "company": "Acme", "clients": { "client_name": "Dupont" } })).unwrap();
    let html = render(&ctx);
    assert!(html.contains("background:#2f4f4f"));
}

#[test]
fn test_submitted_markup_is_escaped() {
    let ctx = prepare(&json!({
        "company": "<script>alert(1)</script>",
        "clients": { "client_name": "Dupont" }
    }))
    .unwrap();
    let html = render(&ctx);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn test_falsy_table_colors_use_defaults() {
    let ctx = prepare(&json!({
        "company": "Acme",
        "tableBackground": false,
        "tableColor": 0,
        "clients": { "client_name": "Dupont" }
    }))
    .unwrap();
    let html = render(&ctx);
    assert!(html.contains("background:#2f4f4f"));
    assert!(html.contains("color:#ffffff"));
    assert!(!html.contains("background:false"));
}

#[test]
fn test_missing_template_file() {
    let result = TemplateSource::load("no/such/template.html");
    assert!(matches!(result, Err(RenderError::Template(_))));
}
