use gloo_timers::callback::Timeout;
use leptos::html;
use leptos::prelude::*;

use crate::models::Message;
use crate::pump::{ChatView, FocusInput};
use crate::toggle::ToggleView;

/// Reactive widget state. The message pump and the toggle controller write
/// to it through their view traits; components subscribe to the read
/// signals.
#[derive(Clone, Copy)]
pub struct WidgetState {
    // --- Read signals (for components to subscribe to) ---
    pub messages: ReadSignal<Vec<Message>>,
    pub typing: ReadSignal<bool>,
    pub sending: ReadSignal<bool>,
    pub quick_actions_visible: ReadSignal<bool>,
    pub open: ReadSignal<bool>,
    pub input: ReadSignal<String>,

    // --- Write signals (for mutating state) ---
    pub set_messages: WriteSignal<Vec<Message>>,
    pub set_typing: WriteSignal<bool>,
    pub set_sending: WriteSignal<bool>,
    pub set_quick_actions_visible: WriteSignal<bool>,
    pub set_open: WriteSignal<bool>,
    pub set_input: WriteSignal<String>,

    pub input_ref: NodeRef<html::Textarea>,
}

impl WidgetState {
    pub fn new() -> Self {
        let (messages, set_messages) = signal(Vec::<Message>::new());
        let (typing, set_typing) = signal(false);
        let (sending, set_sending) = signal(false);
        let (quick_actions_visible, set_quick_actions_visible) = signal(true);
        let (open, set_open) = signal(false);
        let (input, set_input) = signal(String::new());

        Self {
            messages,
            typing,
            sending,
            quick_actions_visible,
            open,
            input,
            set_messages,
            set_typing,
            set_sending,
            set_quick_actions_visible,
            set_open,
            set_input,
            input_ref: NodeRef::new(),
        }
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusInput for WidgetState {
    fn focus_input(&self) {
        // Deferred: the textarea may still be hidden or disabled until the
        // pending class/attribute updates are flushed.
        let input_ref = self.input_ref;
        Timeout::new(0, move || {
            if let Some(input) = input_ref.get_untracked() {
                let _ = input.focus();
            }
        })
        .forget();
    }
}

impl ChatView for WidgetState {
    fn push_message(&self, message: Message) {
        self.set_messages.update(|msgs| msgs.push(message));
    }

    fn clear_messages(&self) {
        self.set_messages.set(Vec::new());
    }

    fn set_typing(&self, visible: bool) {
        self.set_typing.set(visible);
    }

    fn set_busy(&self, busy: bool) {
        self.set_sending.set(busy);
    }

    fn set_quick_actions_visible(&self, visible: bool) {
        self.set_quick_actions_visible.set(visible);
    }

    fn set_input(&self, text: &str) {
        self.set_input.set(text.to_string());
    }
}

impl ToggleView for WidgetState {
    fn set_open(&self, open: bool) {
        self.set_open.set(open);
    }
}
