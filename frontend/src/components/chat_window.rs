use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::dom::WidgetContext;
use crate::models::Message;

/// The conversation window: header, message list, quick actions and input.
#[component]
pub fn ChatWindow() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();
    let open = ctx.state.open;

    view! {
        <div
            class=move || if open.get() { "mb-window mb-open" } else { "mb-window" }
            role="dialog"
            aria-label=ctx.strings.title
        >
            <WindowHeader />
            <MessageList />
            <QuickActionRow />
            <InputBar />
        </div>
    }
}

/// Title bar with the reset and close buttons.
#[component]
fn WindowHeader() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();

    view! {
        <div class="mb-header">
            <div class="mb-header-text">
                <div class="mb-title">{ctx.strings.title}</div>
                <div class="mb-subtitle">{ctx.strings.subtitle}</div>
            </div>
            <button
                type="button"
                class="mb-icon-btn"
                title=ctx.strings.refresh
                aria-label=ctx.strings.refresh
                on:click=move |_| ctx.refresh()
            >
                "↻"
            </button>
            <button
                type="button"
                class="mb-icon-btn"
                title=ctx.strings.close_chat
                aria-label=ctx.strings.close_chat
                on:click=move |_| ctx.close()
            >
                "✕"
            </button>
        </div>
    }
}

/// Message history plus the typing indicator, kept scrolled to the bottom.
#[component]
fn MessageList() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();
    let state = ctx.state;
    let list_ref = NodeRef::<html::Div>::new();

    Effect::new(move |_| {
        state.messages.track();
        state.typing.track();
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    view! {
        <div class="mb-messages" node_ref=list_ref aria-live="polite">
            <For
                each=move || state.messages.get()
                key=|m| m.id
                let:msg
            >
                <MessageBubble message=msg />
            </For>
            <Show when=move || state.typing.get()>
                <TypingIndicator label=ctx.strings.typing />
            </Show>
        </div>
    }
}

/// A single chat message; newlines become line breaks.
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let body = message
        .lines()
        .into_iter()
        .map(str::to_string)
        .enumerate()
        .map(|(i, line)| {
            view! {
                {(i > 0).then(|| view! { <br /> })}
                {line}
            }
        })
        .collect_view();

    view! {
        <div class=message.role.css_class() data-role=message.role.as_str()>
            {body}
        </div>
    }
}

#[component]
fn TypingIndicator(label: &'static str) -> impl IntoView {
    view! {
        <div class="mb-typing" role="status" aria-label=label>
            <span></span>
            <span></span>
            <span></span>
        </div>
    }
}

/// Canned prompts; hidden after the first exchange until the next reset.
#[component]
fn QuickActionRow() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();
    let visible = ctx.state.quick_actions_visible;

    view! {
        <div class=move || if visible.get() { "mb-quick" } else { "mb-quick mb-hidden" }>
            {ctx
                .quick_actions
                .iter()
                .copied()
                .map(|action| {
                    view! {
                        <button
                            type="button"
                            class="mb-quick-btn"
                            on:click=move |_| ctx.select_quick_action(action)
                        >
                            {action.label}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Text field and send button. Enter sends, Shift+Enter adds a newline.
#[component]
fn InputBar() -> impl IntoView {
    let ctx = expect_context::<WidgetContext>();
    let state = ctx.state;

    let is_sending = move || state.sending.get();
    let send = move || ctx.submit(state.input.get_untracked());

    let on_keydown = move |ev: ev::KeyboardEvent| {
        // Enter while an IME composition is open only commits the syllable.
        if ev.key() == "Enter" && !ev.shift_key() && !ev.is_composing() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="mb-input-bar">
            <textarea
                class="mb-input"
                rows="1"
                node_ref=state.input_ref
                placeholder=ctx.strings.placeholder
                prop:value=move || state.input.get()
                on:input=move |ev| {
                    state.set_input.set(event_target_value(&ev));
                }
                on:keydown=on_keydown
            />
            <button
                type="button"
                class="mb-send"
                on:click=move |_| send()
                disabled=is_sending
            >
                {ctx.strings.send}
            </button>
        </div>
    }
}
