use serde::Deserialize;

use crate::errors::WidgetError;
use crate::i18n::Locale;
use crate::pump::StaleReplyPolicy;
use crate::session::{Persistence, DEFAULT_SESSION_KEY};
use crate::style::Theme;

/// Options handed over by the embedding page, usually collected from the
/// loader script's `data-*` attributes. Unknown values fall back to
/// defaults rather than failing the mount.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    #[serde(alias = "api_base")]
    pub api: Option<String>,
    pub theme: Option<String>,
    #[serde(alias = "locale")]
    pub lang: Option<String>,
    pub storage_key: Option<String>,
    /// `false` keeps the session token in page memory only.
    pub persist_session: Option<bool>,
    pub discard_stale_replies: Option<bool>,
    pub log_level: Option<String>,
}

impl EmbedOptions {
    /// Parses the JSON options object; `None` or blank input means defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, WidgetError> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(json) => Ok(serde_json::from_str(json)?),
        }
    }
}

/// Resolved widget configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Base URL of the chat API; empty means same origin.
    pub api_base: String,
    pub theme: Theme,
    pub locale: Locale,
    pub storage_key: String,
    pub persistence: Persistence,
    pub stale_replies: StaleReplyPolicy,
    pub log_level: log::Level,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            theme: Theme::default(),
            locale: Locale::default(),
            storage_key: DEFAULT_SESSION_KEY.to_string(),
            persistence: Persistence::default(),
            stale_replies: StaleReplyPolicy::default(),
            log_level: log::Level::Warn,
        }
    }
}

impl From<EmbedOptions> for WidgetConfig {
    fn from(opts: EmbedOptions) -> Self {
        let defaults = WidgetConfig::default();
        Self {
            api_base: opts.api.map(|a| a.trim().to_string()).unwrap_or_default(),
            theme: opts.theme.as_deref().and_then(Theme::parse).unwrap_or(defaults.theme),
            locale: opts.lang.as_deref().and_then(Locale::parse).unwrap_or(defaults.locale),
            storage_key: opts
                .storage_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .unwrap_or(defaults.storage_key),
            persistence: match opts.persist_session {
                Some(false) => Persistence::Memory,
                _ => Persistence::Browser,
            },
            stale_replies: match opts.discard_stale_replies {
                Some(false) => StaleReplyPolicy::Accept,
                _ => StaleReplyPolicy::Discard,
            },
            log_level: opts
                .log_level
                .as_deref()
                .and_then(|l| l.trim().parse().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(json: Option<&str>) -> Result<Self, WidgetError> {
        EmbedOptions::from_json(json).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_yield_defaults() {
        let config = WidgetConfig::from_json(None).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.api_base, "");
        assert_eq!(config.storage_key, DEFAULT_SESSION_KEY);

        assert_eq!(WidgetConfig::from_json(Some("  ")).unwrap(), WidgetConfig::default());
        assert_eq!(WidgetConfig::from_json(Some("{}")).unwrap(), WidgetConfig::default());
    }

    #[test]
    fn reads_loader_attributes() {
        let config = WidgetConfig::from_json(Some(
            r#"{"api":" https://duon.myds.me ","theme":"glass","lang":"en","log_level":"debug"}"#,
        ))
        .unwrap();
        assert_eq!(config.api_base, "https://duon.myds.me");
        assert_eq!(config.theme, Theme::Glass);
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn unknown_values_fall_back() {
        let config = WidgetConfig::from_json(Some(
            r#"{"theme":"neon","lang":"fr","storage_key":"  ","log_level":"loud","extra":true}"#,
        ))
        .unwrap();
        assert_eq!(config.theme, Theme::Classic);
        assert_eq!(config.locale, Locale::Korean);
        assert_eq!(config.storage_key, DEFAULT_SESSION_KEY);
        assert_eq!(config.log_level, log::Level::Warn);
    }

    #[test]
    fn stale_reply_policy_is_opt_out() {
        let accept = WidgetConfig::from_json(Some(r#"{"discard_stale_replies":false}"#)).unwrap();
        assert_eq!(accept.stale_replies, StaleReplyPolicy::Accept);
        let discard = WidgetConfig::from_json(Some(r#"{"discard_stale_replies":true}"#)).unwrap();
        assert_eq!(discard.stale_replies, StaleReplyPolicy::Discard);
    }

    #[test]
    fn session_persistence_is_opt_out() {
        let config = WidgetConfig::from_json(None).unwrap();
        assert_eq!(config.persistence, Persistence::Browser);
        let memory = WidgetConfig::from_json(Some(r#"{"persist_session":false}"#)).unwrap();
        assert_eq!(memory.persistence, Persistence::Memory);
        let browser = WidgetConfig::from_json(Some(r#"{"persist_session":true}"#)).unwrap();
        assert_eq!(browser.persistence, Persistence::Browser);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            WidgetConfig::from_json(Some("{not json")),
            Err(WidgetError::InvalidOptions(_))
        ));
    }
}
