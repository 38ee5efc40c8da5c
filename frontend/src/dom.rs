use std::rc::Rc;

use leptos::mount::mount_to;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::api::HttpTransport;
use crate::components::chat_window::ChatWindow;
use crate::components::launcher::Launcher;
use crate::config::WidgetConfig;
use crate::embed::WidgetHandle;
use crate::errors::WidgetError;
use crate::i18n::Strings;
use crate::models::QuickAction;
use crate::pump::MessagePump;
use crate::quick_actions;
use crate::session::{SessionStore, WidgetStorage};
use crate::state::WidgetState;
use crate::style::{self, ROOT_ID};
use crate::toggle::ToggleController;

pub type WidgetPump = MessagePump<WidgetState, HttpTransport, WidgetStorage>;
pub type WidgetToggle = ToggleController<WidgetState>;

/// Everything the components need, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct WidgetContext {
    pub state: WidgetState,
    pub pump: StoredValue<Rc<WidgetPump>, LocalStorage>,
    pub toggle: StoredValue<Rc<WidgetToggle>, LocalStorage>,
    pub strings: Strings,
    pub quick_actions: &'static [QuickAction],
}

impl WidgetContext {
    /// Runs a submission in the background; the pump's guard decides whether
    /// it goes out.
    pub fn submit(&self, text: String) {
        let pump = self.pump.get_value();
        spawn_local(async move {
            pump.submit(&text).await;
        });
    }

    pub fn select_quick_action(&self, action: QuickAction) {
        let pump = self.pump.get_value();
        spawn_local(async move {
            pump.select_quick_action(&action).await;
        });
    }

    pub fn refresh(&self) {
        self.pump.with_value(|pump| pump.refresh());
    }

    pub fn toggle(&self) {
        self.toggle.with_value(|toggle| {
            toggle.toggle();
        });
    }

    pub fn close(&self) {
        self.toggle.with_value(|toggle| toggle.close());
    }
}

pub fn document() -> Result<Document, WidgetError> {
    web_sys::window()
        .ok_or(WidgetError::NoWindow)?
        .document()
        .ok_or(WidgetError::NoDocument)
}

/// Builds the widget under a new root element appended to `<body>`.
///
/// Does not check for an existing root; callers that may run twice should
/// go through [`crate::embed::mount_widget`].
pub fn build(config: WidgetConfig) -> Result<WidgetHandle, WidgetError> {
    let document = document()?;
    let body = document.body().ok_or(WidgetError::NoBody)?;

    match style::inject_stylesheet(&document, config.theme) {
        Ok(true) => log::debug!("Widget stylesheet injected ({})", config.theme.as_str()),
        Ok(false) => {}
        Err(e) => log::warn!("Widget stylesheet not injected, continuing unstyled: {e}"),
    }

    let root = document.create_element("div").map_err(WidgetError::dom)?;
    root.set_id(ROOT_ID);
    root.set_attribute("data-theme", config.theme.as_str())
        .map_err(WidgetError::dom)?;
    root.set_attribute("lang", config.locale.html_lang())
        .map_err(WidgetError::dom)?;
    body.append_child(&root).map_err(WidgetError::dom)?;
    let root = root
        .dyn_into::<HtmlElement>()
        .map_err(|el| WidgetError::dom(el.into()))?;

    let strings = Strings::for_locale(config.locale);
    let state = WidgetState::new();
    let pump = Rc::new(MessagePump::new(
        state,
        HttpTransport::new(&config.api_base),
        SessionStore::new(WidgetStorage::new(config.persistence), config.storage_key.clone()),
        strings,
        config.stale_replies,
    ));
    let toggle = Rc::new(ToggleController::new(state));
    pump.greet();

    let ctx = WidgetContext {
        state,
        pump: StoredValue::new_local(pump.clone()),
        toggle: StoredValue::new_local(toggle.clone()),
        strings,
        quick_actions: quick_actions::catalog(config.locale),
    };
    mount_to(root, move || view! { <ChatWidget ctx=ctx /> }).forget();

    log::debug!("Widget mounted (api base: {:?})", config.api_base);
    Ok(WidgetHandle::new(pump, toggle))
}

#[component]
fn ChatWidget(ctx: WidgetContext) -> impl IntoView {
    provide_context(ctx);

    view! {
        <ChatWindow />
        <Launcher />
    }
}
