use std::path::PathBuf;

use crate::errors::HostError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WIDGET_DIR: &str = "frontend/pkg";
const THEMES: &[&str] = &["classic", "glass"];
const LANGS: &[&str] = &["ko", "en"];

/// Widget host settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
    /// Directory holding the wasm-bindgen output (`mintobot_widget.js`,
    /// `mintobot_widget_bg.wasm`).
    pub widget_dir: PathBuf,
    /// Written into the demo page's `data-api`; empty means same origin.
    pub api_base: String,
    pub theme: String,
    pub lang: String,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|source| HostError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let theme = get("WIDGET_THEME").unwrap_or_else(|| THEMES[0].to_string()).to_lowercase();
        if !THEMES.contains(&theme.as_str()) {
            return Err(HostError::InvalidTheme { value: theme });
        }

        let lang = get("WIDGET_LANG").unwrap_or_else(|| LANGS[0].to_string()).to_lowercase();
        if !LANGS.contains(&lang.as_str()) {
            return Err(HostError::InvalidLang { value: lang });
        }

        Ok(Self {
            port,
            widget_dir: get("WIDGET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WIDGET_DIR)),
            api_base: get("WIDGET_API_BASE").unwrap_or_default(),
            theme,
            lang,
        })
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
