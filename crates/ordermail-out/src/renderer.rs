//! Template rendering for the order email.
//!
//! Uses Handlebars with two custom helpers:
//! - eq: strict equality, as a subexpression `(eq a b)` or a block `{{#eq a b}}`
//! - formatCurrency: number with exactly two fractional digits

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext as HbsRenderContext,
    RenderError as HbsRenderError, Renderable, ScopedJson,
};
use ordermail_core::numeric::{to_fixed, to_number};
use ordermail_core::RenderContext;
use serde_json::Value;

use crate::RenderError;

/// Name the email template is registered under
pub const EMAIL_TEMPLATE: &str = "email";

/// Handlebars registry with the email helpers installed
pub struct EmailRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for EmailRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars.register_helper("eq", Box::new(EqHelper));
        handlebars.register_helper("formatCurrency", Box::new(FormatCurrencyHelper));

        EmailRenderer { handlebars }
    }

    /// Compile `source` and register it under `name`
    pub fn compile(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.handlebars
            .register_template_string(name, source)
            .map_err(|e| RenderError::Compile(e.to_string()))
    }

    /// Render a compiled template
    pub fn render(&self, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        self.handlebars
            .render(name, &ctx.to_value())
            .map_err(|e| RenderError::Render(e.to_string()))
    }

}

// ============================================================================
// Custom Helpers
// ============================================================================

fn params_equal(h: &Helper<'_>) -> bool {
    match (h.param(0), h.param(1)) {
        (Some(left), Some(right)) => strict_equal(left.value(), right.value()),
        _ => false,
    }
}

/// Numbers compare by value whatever their representation (`2` == `2.0`)
fn strict_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

/// Strict equality; no coercion between strings and numbers
struct EqHelper;

impl HelperDef for EqHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut HbsRenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, HbsRenderError> {
        Ok(ScopedJson::Derived(Value::Bool(params_equal(h))))
    }

    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut HbsRenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let equal = params_equal(h);

        if h.is_block() {
            let branch = if equal { h.template() } else { h.inverse() };
            if let Some(template) = branch {
                template.render(r, ctx, rc, out)?;
            }
        } else {
            out.write(if equal { "true" } else { "false" })?;
        }

        Ok(())
    }
}

/// Format a value as an amount with two decimals ("6" -> "6.00")
struct FormatCurrencyHelper;

impl HelperDef for FormatCurrencyHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut HbsRenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, HbsRenderError> {
        let amount = h.param(0).map(|v| to_number(v.value())).unwrap_or(f64::NAN);
        Ok(ScopedJson::Derived(Value::String(to_fixed(amount, 2))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, data: Value) -> String {
        let mut renderer = EmailRenderer::new();
        renderer.compile("t", source).unwrap();
        renderer.handlebars.render("t", &data).unwrap()
    }

    #[test]
    fn test_format_currency_helper() {
        assert_eq!(render("{{formatCurrency v}}", json!({ "v": "6" })), "6.00");
        assert_eq!(render("{{formatCurrency v}}", json!({ "v": 2.675 })), "2.67");
        assert_eq!(render("{{formatCurrency v}}", json!({ "v": "12.5 EUR" })), "12.50");
        assert_eq!(render("{{formatCurrency v}}", json!({ "v": "n/a" })), "NaN");
        assert_eq!(render("{{formatCurrency missing}}", json!({})), "NaN");
    }

    #[test]
    fn test_eq_as_subexpression() {
        let source = "{{#if (eq mode \"dark\")}}D{{else}}L{{/if}}";
        assert_eq!(render(source, json!({ "mode": "dark" })), "D");
        assert_eq!(render(source, json!({ "mode": "light" })), "L");
    }

    #[test]
    fn test_eq_as_block() {
        let source = "{{#eq n 1}}one{{else}}other{{/eq}}";
        assert_eq!(render(source, json!({ "n": 1 })), "one");
        assert_eq!(render(source, json!({ "n": 2 })), "other");
    }

    #[test]
    fn test_eq_integer_and_float_equal() {
        let data: Value = serde_json::from_str(r#"{ "n": 2.0, "m": 2 }"#).unwrap();
        let source = "{{#if (eq n 2)}}same{{else}}different{{/if}}";
        assert_eq!(render(source, data.clone()), "same");
        assert_eq!(render("{{#eq n m}}same{{else}}different{{/eq}}", data.clone()), "same");
        assert_eq!(render("{{#if (eq n 2.5)}}same{{else}}different{{/if}}", data), "different");
    }

    #[test]
    fn test_eq_is_strict() {
        let source = "{{#if (eq n \"1\")}}same{{else}}different{{/if}}";
        assert_eq!(render(source, json!({ "n": 1 })), "different");
    }

    #[test]
    fn test_html_escaped() {
        assert_eq!(
            render("<td>{{name}}</td>", json!({ "name": "<b>Dupont & Fils</b>" })),
            "<td>&lt;b&gt;Dupont &amp; Fils&lt;/b&gt;</td>"
        );
    }

    #[test]
    fn test_compile_error_reported() {
        let mut renderer = EmailRenderer::new();
        let err = renderer.compile("broken", "{{#each clients}}").unwrap_err();
        assert!(matches!(err, RenderError::Compile(_)));
        assert!(!renderer.handlebars.has_template("broken"));
    }
}
