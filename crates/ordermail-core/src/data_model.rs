//! Data Model: ClientRecord, ProductRecord, RenderContext
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A field the transport may deliver either once (bare value) or repeated
/// (sequence). Normalized into a `Vec<T>` at the boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

impl OneOrMany<Value> {
    /// Classify an already-decoded value. Never fails: anything that is not a
    /// sequence is a single item.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items),
            other => Self::One(other),
        }
    }
}

/// One product line. Only `quantity` and `price_ttc` are read; every other
/// field is carried through to the template untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ProductRecord {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn quantity(&self) -> Option<&Value> {
        self.fields.get("quantity")
    }

    pub fn price_ttc(&self) -> Option<&Value> {
        self.fields.get("price_ttc")
    }
}

/// One client with its product lines and per-order charges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Opaque client fields, including `order_livr` and `order_tbr`
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    /// Set by the totalizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_grand_total: Option<String>,
}

impl ClientRecord {
    pub fn new(fields: Map<String, Value>, products: Vec<ProductRecord>) -> Self {
        Self {
            fields,
            products,
            order_grand_total: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Delivery charge
    pub fn order_livr(&self) -> Option<&Value> {
        self.fields.get("order_livr")
    }

    /// Fiscal stamp charge
    pub fn order_tbr(&self) -> Option<&Value> {
        self.fields.get("order_tbr")
    }
}

/// Everything the email template sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    pub company: String,
    #[serde(rename = "tableBackground", default, skip_serializing_if = "Option::is_none")]
    pub table_background: Option<String>,
    #[serde(rename = "tableColor", default, skip_serializing_if = "Option::is_none")]
    pub table_color: Option<String>,
    pub clients: Vec<ClientRecord>,
}

impl RenderContext {
    /// Serialize for the template engine.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
