use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// Remote classifier endpoint. Unset means `/detect` answers 503.
    pub classifier_url: Option<String>,
    pub classifier_api_key: Option<String>,
    pub max_upload_bytes: usize,
    pub top_k: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            classifier_url: None,
            classifier_api_key: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Settings {
    /// Reads the process environment. `main` loads `.env` into it first.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        let get = |key: &str| vars.get(key).filter(|v| !v.trim().is_empty()).cloned();

        if let Some(v) = get("BIND_ADDR") {
            settings.bind_addr = v;
        }
        settings.classifier_url = get("CLASSIFIER_URL");
        settings.classifier_api_key = get("CLASSIFIER_API_KEY");
        if let Some(v) = get("MAX_UPLOAD_BYTES") {
            settings.max_upload_bytes = v
                .trim()
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTES is not a byte count: {v}"))?;
        }
        if let Some(v) = get("TOP_K") {
            settings.top_k = v
                .trim()
                .parse()
                .with_context(|| format!("TOP_K is not a number: {v}"))?;
        }

        Ok(settings)
    }
}
