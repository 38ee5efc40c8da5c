use thiserror::Error;

/// Errors raised by the widget host.
#[derive(Debug, Error)]
pub enum HostError {
    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("PORT must be a number between 0 and 65535, got '{value}'")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("WIDGET_THEME must be 'classic' or 'glass', got '{value}'")]
    InvalidTheme { value: String },

    #[error("WIDGET_LANG must be 'ko' or 'en', got '{value}'")]
    InvalidLang { value: String },

    // ── Rendering errors ─────────────────────────────────────────────────────
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

