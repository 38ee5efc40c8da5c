use leptos::prelude::*;

use crate::dom::WidgetContext;

/// Floating bubble that opens and closes the chat window.
#[component]
pub fn Launcher() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();
    let open = ctx.state.open;

    view! {
        <button
            type="button"
            class=move || if open.get() { "mb-bubble mb-open" } else { "mb-bubble" }
            aria-label=move || if open.get() { ctx.strings.close_chat } else { ctx.strings.open_chat }
            aria-expanded=move || open.get().to_string()
            on:click=move |_| ctx.toggle()
        >
            {move || if open.get() { "✕" } else { "💬" }}
        </button>
    }
}
