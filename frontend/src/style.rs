//! Scoped stylesheet for the widget.
//!
//! Every rule is anchored at the root element id and every declaration is
//! `!important`, so host-page rules neither match widget elements nor win
//! against widget rules.

use web_sys::Document;

use crate::errors::WidgetError;

pub const ROOT_ID: &str = "mintobot-widget";
pub const STYLE_ID: &str = "mintobot-widget-style";

/// Visual skin. Purely presentational.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Classic,
    Glass,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Some(Theme::Classic),
            "glass" => Some(Theme::Glass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Glass => "glass",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Classic => Palette {
                accent: "#2563eb",
                accent_text: "#ffffff",
                surface: "#ffffff",
                panel: "#f8fafc",
                text: "#0f172a",
                muted: "#64748b",
                user_bubble: "#2563eb",
                user_text: "#ffffff",
                assistant_bubble: "#eef2f7",
                border: "#e2e8f0",
                blur_px: 0,
                window_radius_px: 16,
                bubble_radius_px: 14,
                shadow: "0 12px 40px rgba(15, 23, 42, 0.18)",
            },
            Theme::Glass => Palette {
                accent: "#60a5fa",
                accent_text: "#0f172a",
                surface: "rgba(15, 23, 42, 0.72)",
                panel: "rgba(30, 41, 59, 0.55)",
                text: "#e2e8f0",
                muted: "#94a3b8",
                user_bubble: "rgba(96, 165, 250, 0.85)",
                user_text: "#0f172a",
                assistant_bubble: "rgba(148, 163, 184, 0.18)",
                border: "rgba(148, 163, 184, 0.25)",
                blur_px: 18,
                window_radius_px: 22,
                bubble_radius_px: 18,
                shadow: "0 18px 50px rgba(2, 6, 23, 0.45)",
            },
        }
    }
}

/// Colors, blur and radii of a theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub accent: &'static str,
    pub accent_text: &'static str,
    pub surface: &'static str,
    pub panel: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub user_bubble: &'static str,
    pub user_text: &'static str,
    pub assistant_bubble: &'static str,
    pub border: &'static str,
    pub blur_px: u32,
    pub window_radius_px: u32,
    pub bubble_radius_px: u32,
    pub shadow: &'static str,
}

/// Accumulates rules, prefixing selectors with the root id and marking
/// every declaration `!important`.
struct ScopedSheet {
    css: String,
}

impl ScopedSheet {
    fn new() -> Self {
        Self { css: String::new() }
    }

    /// `selectors` is a comma separated list relative to the root; an empty
    /// entry targets the root itself.
    fn rule(&mut self, selectors: &str, declarations: &[(&str, String)]) -> &mut Self {
        let scoped = selectors
            .split(',')
            .map(|s| {
                let s = s.trim();
                if s.is_empty() {
                    format!("#{ROOT_ID}")
                } else if s.starts_with(':') {
                    format!("#{ROOT_ID}{s}")
                } else {
                    format!("#{ROOT_ID} {s}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.css.push_str(&scoped);
        self.css.push_str(" {");
        for (property, value) in declarations {
            self.css.push_str(&format!(" {property}: {value} !important;"));
        }
        self.css.push_str(" }\n");
        self
    }

    fn keyframes(&mut self, name: &str, body: &str) -> &mut Self {
        self.css.push_str(&format!("@keyframes mb-{name} {{ {body} }}\n"));
        self
    }

    fn media(&mut self, query: &str, build: impl FnOnce(&mut ScopedSheet)) -> &mut Self {
        let mut inner = ScopedSheet::new();
        build(&mut inner);
        self.css.push_str(&format!("@media {query} {{\n{}}}\n", inner.css));
        self
    }
}

fn d(property: &'static str, value: impl Into<String>) -> (&'static str, String) {
    (property, value.into())
}

/// Renders the complete stylesheet for `theme`.
pub fn stylesheet(theme: Theme) -> String {
    let p = theme.palette();
    let backdrop = if p.blur_px > 0 {
        format!("blur({}px) saturate(160%)", p.blur_px)
    } else {
        "none".to_string()
    };
    let mut sheet = ScopedSheet::new();

    // reset
    sheet
        .rule(
            ", *, *::before, *::after",
            &[
                d("box-sizing", "border-box"),
                d("margin", "0"),
                d("padding", "0"),
                d("border", "0"),
                d("font-family", "-apple-system, BlinkMacSystemFont, 'Segoe UI', 'Apple SD Gothic Neo', 'Noto Sans KR', sans-serif"),
                d("font-size", "14px"),
                d("line-height", "1.5"),
                d("letter-spacing", "normal"),
                d("text-transform", "none"),
                d("text-align", "left"),
                d("background", "none"),
                d("color", p.text),
                d("float", "none"),
                d("max-width", "none"),
                d("min-width", "0"),
            ],
        )
        .rule(
            "",
            &[
                d("position", "fixed"),
                d("right", "20px"),
                d("bottom", "20px"),
                d("z-index", "2147483000"),
            ],
        );

    // launcher bubble
    sheet
        .rule(
            ".mb-bubble",
            &[
                d("display", "flex"),
                d("align-items", "center"),
                d("justify-content", "center"),
                d("width", "60px"),
                d("height", "60px"),
                d("border-radius", "50%"),
                d("background", p.accent),
                d("color", p.accent_text),
                d("font-size", "26px"),
                d("cursor", "pointer"),
                d("box-shadow", p.shadow),
                d("transition", "transform 0.2s ease"),
                d("margin-left", "auto"),
            ],
        )
        .rule(".mb-bubble:hover", &[d("transform", "scale(1.06)")])
        .rule(".mb-bubble.mb-open", &[d("transform", "rotate(90deg)")]);

    // window
    sheet
        .rule(
            ".mb-window",
            &[
                d("display", "none"),
                d("flex-direction", "column"),
                d("position", "absolute"),
                d("right", "0"),
                d("bottom", "76px"),
                d("width", "370px"),
                d("height", "560px"),
                d("max-height", "calc(100vh - 120px)"),
                d("overflow", "hidden"),
                d("background", p.surface),
                d("border", format!("1px solid {}", p.border)),
                d("border-radius", format!("{}px", p.window_radius_px)),
                d("box-shadow", p.shadow),
                d("backdrop-filter", backdrop.clone()),
                d("-webkit-backdrop-filter", backdrop),
            ],
        )
        .rule(
            ".mb-window.mb-open",
            &[d("display", "flex"), d("animation", "mb-rise 0.2s ease-out")],
        );

    // header
    sheet
        .rule(
            ".mb-header",
            &[
                d("display", "flex"),
                d("align-items", "center"),
                d("gap", "8px"),
                d("padding", "14px 16px"),
                d("background", p.accent),
                d("color", p.accent_text),
            ],
        )
        .rule(".mb-header-text", &[d("flex", "1")])
        .rule(
            ".mb-title",
            &[d("font-size", "15px"), d("font-weight", "700"), d("color", p.accent_text)],
        )
        .rule(
            ".mb-subtitle",
            &[d("font-size", "12px"), d("opacity", "0.85"), d("color", p.accent_text)],
        )
        .rule(
            ".mb-icon-btn",
            &[
                d("width", "30px"),
                d("height", "30px"),
                d("border-radius", "50%"),
                d("cursor", "pointer"),
                d("font-size", "16px"),
                d("color", p.accent_text),
                d("text-align", "center"),
            ],
        )
        .rule(".mb-icon-btn:hover", &[d("background", "rgba(255, 255, 255, 0.2)")]);

    // messages
    sheet
        .rule(
            ".mb-messages",
            &[
                d("flex", "1"),
                d("display", "flex"),
                d("flex-direction", "column"),
                d("gap", "10px"),
                d("padding", "16px"),
                d("overflow-y", "auto"),
                d("background", p.panel),
            ],
        )
        .rule(
            ".mb-msg",
            &[
                d("max-width", "82%"),
                d("padding", "10px 13px"),
                d("border-radius", format!("{}px", p.bubble_radius_px)),
                d("white-space", "normal"),
                d("word-break", "break-word"),
            ],
        )
        .rule(
            ".mb-user",
            &[
                d("align-self", "flex-end"),
                d("background", p.user_bubble),
                d("color", p.user_text),
                d("border-bottom-right-radius", "4px"),
            ],
        )
        .rule(".mb-user *", &[d("color", p.user_text)])
        .rule(
            ".mb-assistant",
            &[
                d("align-self", "flex-start"),
                d("background", p.assistant_bubble),
                d("border-bottom-left-radius", "4px"),
            ],
        )
        .rule(
            ".mb-typing",
            &[
                d("display", "inline-flex"),
                d("gap", "4px"),
                d("align-self", "flex-start"),
                d("padding", "12px 14px"),
                d("border-radius", format!("{}px", p.bubble_radius_px)),
                d("background", p.assistant_bubble),
            ],
        )
        .rule(
            ".mb-typing span",
            &[
                d("display", "block"),
                d("width", "7px"),
                d("height", "7px"),
                d("border-radius", "50%"),
                d("background", p.muted),
                d("animation", "mb-blink 1.2s infinite ease-in-out"),
            ],
        )
        .rule(".mb-typing span:nth-child(2)", &[d("animation-delay", "0.2s")])
        .rule(".mb-typing span:nth-child(3)", &[d("animation-delay", "0.4s")]);

    // quick actions
    sheet
        .rule(
            ".mb-quick",
            &[
                d("display", "flex"),
                d("flex-wrap", "wrap"),
                d("gap", "6px"),
                d("padding", "8px 12px"),
                d("background", p.panel),
                d("border-top", format!("1px solid {}", p.border)),
            ],
        )
        .rule(".mb-quick.mb-hidden", &[d("display", "none")])
        .rule(
            ".mb-quick-btn",
            &[
                d("padding", "5px 11px"),
                d("border", format!("1px solid {}", p.accent)),
                d("border-radius", "999px"),
                d("color", p.accent),
                d("font-size", "12.5px"),
                d("cursor", "pointer"),
            ],
        )
        .rule(
            ".mb-quick-btn:hover",
            &[d("background", p.accent), d("color", p.accent_text)],
        );

    // input bar
    sheet
        .rule(
            ".mb-input-bar",
            &[
                d("display", "flex"),
                d("align-items", "flex-end"),
                d("gap", "8px"),
                d("padding", "10px 12px"),
                d("background", p.surface),
                d("border-top", format!("1px solid {}", p.border)),
            ],
        )
        .rule(
            ".mb-input",
            &[
                d("flex", "1"),
                d("resize", "none"),
                d("min-height", "38px"),
                d("max-height", "110px"),
                d("padding", "8px 12px"),
                d("border", format!("1px solid {}", p.border)),
                d("border-radius", "12px"),
                d("background", p.panel),
                d("outline", "none"),
            ],
        )
        .rule(".mb-input:focus", &[d("border-color", p.accent)])
        .rule(
            ".mb-send",
            &[
                d("height", "38px"),
                d("padding", "0 14px"),
                d("border-radius", "12px"),
                d("background", p.accent),
                d("color", p.accent_text),
                d("font-weight", "600"),
                d("cursor", "pointer"),
            ],
        )
        .rule(
            ".mb-send:disabled",
            &[d("opacity", "0.5"), d("cursor", "not-allowed")],
        );

    sheet
        .keyframes(
            "rise",
            "from { opacity: 0; transform: translateY(12px); } to { opacity: 1; transform: translateY(0); }",
        )
        .keyframes(
            "blink",
            "0%, 80%, 100% { opacity: 0.3; transform: scale(0.8); } 40% { opacity: 1; transform: scale(1); }",
        )
        .media("(max-width: 480px)", |m| {
            m.rule("", &[d("right", "12px"), d("bottom", "12px")]).rule(
                ".mb-window",
                &[
                    d("position", "fixed"),
                    d("left", "8px"),
                    d("right", "8px"),
                    d("bottom", "84px"),
                    d("width", "auto"),
                    d("height", "calc(100vh - 100px)"),
                ],
            );
        });

    sheet.css
}

/// Inserts the stylesheet into `<head>` unless it is already there.
/// Returns whether an element was inserted.
pub fn inject_stylesheet(document: &Document, theme: Theme) -> Result<bool, WidgetError> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(false);
    }
    let head = document.head().ok_or_else(|| WidgetError::Dom("document has no head".into()))?;
    let style = document.create_element("style").map_err(WidgetError::dom)?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(&stylesheet(theme)));
    head.append_child(&style).map_err(WidgetError::dom)?;
    Ok(true)
}
