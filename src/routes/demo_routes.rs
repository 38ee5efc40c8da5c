use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::error;

use crate::errors::HostError;
use crate::routes::HostState;

// ── Template structs ──────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "demo.html")]
struct DemoTemplate<'a> {
    api_base: &'a str,
    theme: &'a str,
    lang: &'a str,
    title: &'a str,
    tagline: &'a str,
    hint: &'a str,
}

impl<'a> DemoTemplate<'a> {
    fn new(api_base: &'a str, theme: &'a str, lang: &'a str) -> Self {
        let (title, tagline, hint) = match lang {
            "en" => (
                "Mintobot",
                "AI assistant of Duon Education Publishing",
                "👇 Open the chat bubble in the bottom-right corner",
            ),
            _ => (
                "민토봇",
                "두온교육 출판사 AI 어시스턴트",
                "👇 오른쪽 하단 채팅 버튼을 눌러보세요",
            ),
        };
        Self { api_base, theme, lang, title, tagline, hint }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/` — send visitors to the demo
pub async fn index_handler() -> Redirect {
    Redirect::temporary("/demo")
}

/// GET `/demo` — landing page embedding the widget
pub async fn demo_handler(State(state): State<HostState>) -> Response {
    let cfg = &state.config;
    render(DemoTemplate::new(&cfg.api_base, &cfg.theme, &cfg.lang))
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn render(tmpl: impl Template) -> Response {
    match tmpl.render().map_err(HostError::from) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
