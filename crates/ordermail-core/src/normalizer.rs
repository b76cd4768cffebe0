//! Form normalization.
//!
//! Canonicalizes a decoded submission into a `RenderContext`:
//! - `clients` becomes a sequence whether one or many were submitted
//! - each client's `products` becomes a sequence the same way
//! - every other client and product field passes through untouched

use serde_json::{Map, Value};

use crate::data_model::{ClientRecord, OneOrMany, ProductRecord, RenderContext};
use crate::error::FormError;
use crate::numeric::{is_truthy, value_to_string};

/// Normalize a decoded request body.
///
/// Fails with [`FormError::MissingFormData`] when `company` or `clients` is
/// absent or falsy.
pub fn normalize(raw: &Value) -> Result<RenderContext, FormError> {
    let company = raw.get("company").filter(|v| is_truthy(v));
    let clients = raw.get("clients").filter(|v| is_truthy(v));

    let (Some(company), Some(clients)) = (company, clients) else {
        tracing::debug!(
            has_company = raw.get("company").is_some(),
            has_clients = raw.get("clients").is_some(),
            "submission rejected"
        );
        return Err(FormError::MissingFormData);
    };

    let clients: Vec<ClientRecord> = OneOrMany::from_value(clients.clone())
        .into_vec()
        .into_iter()
        .map(normalize_client)
        .collect();

    tracing::debug!(clients = clients.len(), "submission normalized");

    Ok(RenderContext {
        company: value_to_string(company),
        table_background: optional_string(raw.get("tableBackground")),
        table_color: optional_string(raw.get("tableColor")),
        clients,
    })
}

/// Normalize one client entry. Non-object entries become empty records.
pub fn normalize_client(raw: Value) -> ClientRecord {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    let products = normalize_products(fields.remove("products"));
    // recomputed by the totalizer
    fields.remove("order_grand_total");
    ClientRecord::new(fields, products)
}

fn normalize_products(raw: Option<Value>) -> Vec<ProductRecord> {
    match raw {
        Some(value) if is_truthy(&value) => OneOrMany::from_value(value)
            .into_vec()
            .into_iter()
            .map(ProductRecord::from_value)
            .collect(),
        _ => Vec::new(),
    }
}

/// Falsy values leave the template default in place.
fn optional_string(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(value_to_string)
}
