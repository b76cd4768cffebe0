//! Server configuration from the environment.
use std::path::PathBuf;

pub const ADDR_VAR: &str = "ORDERMAIL_ADDR";
pub const TEMPLATE_VAR: &str = "ORDERMAIL_TEMPLATE";
pub const VIEWS_VAR: &str = "ORDERMAIL_VIEWS";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TEMPLATE: &str = "template.html";
const DEFAULT_VIEWS: &str = "views";
const FORM_FILE: &str = "form.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Email template, re-read on every request
    pub template_path: PathBuf,
    /// Static files; `form.html` is served at `/`
    pub views_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            views_dir: PathBuf::from(DEFAULT_VIEWS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            addr: get(ADDR_VAR).unwrap_or(defaults.addr),
            template_path: get(TEMPLATE_VAR).map(PathBuf::from).unwrap_or(defaults.template_path),
            views_dir: get(VIEWS_VAR).map(PathBuf::from).unwrap_or(defaults.views_dir),
        }
    }

    pub fn form_path(&self) -> PathBuf {
        self.views_dir.join(FORM_FILE)
    }
}
