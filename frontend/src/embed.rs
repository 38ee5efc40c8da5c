//! Entry points for the embedding page.
//!
//! The loader script reads its own `data-*` attributes, waits for the
//! document to be ready and calls [`mount_widget`] with them as a JSON
//! object. Mounting is init-once per page: later calls get the same handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::config::WidgetConfig;
use crate::dom::{self, WidgetPump, WidgetToggle};
use crate::errors::WidgetError;
use crate::style::ROOT_ID;

thread_local! {
    static MOUNTED: RefCell<Option<WidgetHandle>> = const { RefCell::new(None) };
}

static LOGGER: Once = Once::new();

fn init_logging(level: log::Level) {
    LOGGER.call_once(|| {
        if console_log::init_with_level(level).is_err() {
            log::warn!("A logger was already installed; keeping it");
        }
    });
}

/// Mounts the widget, or returns the handle of the one already mounted.
#[wasm_bindgen]
pub fn mount_widget(options: Option<String>) -> Result<WidgetHandle, JsValue> {
    if let Some(handle) = MOUNTED.with(|m| m.borrow().clone()) {
        return Ok(handle);
    }

    let config = WidgetConfig::from_json(options.as_deref())?;
    init_logging(config.log_level);

    if dom::document()?.get_element_by_id(ROOT_ID).is_some() {
        log::warn!("Refusing to mount: #{ROOT_ID} already exists");
        return Err(WidgetError::AlreadyMounted.into());
    }

    let handle = dom::build(config)?;
    MOUNTED.with(|m| *m.borrow_mut() = Some(handle.clone()));
    Ok(handle)
}

/// Scripting handle for the host page.
#[wasm_bindgen]
#[derive(Clone)]
pub struct WidgetHandle {
    pump: Rc<WidgetPump>,
    toggle: Rc<WidgetToggle>,
}

impl WidgetHandle {
    pub(crate) fn new(pump: Rc<WidgetPump>, toggle: Rc<WidgetToggle>) -> Self {
        Self { pump, toggle }
    }
}

#[wasm_bindgen]
impl WidgetHandle {
    /// Opens or closes the window; returns whether it is now open.
    pub fn toggle(&self) -> bool {
        self.toggle.toggle()
    }

    pub fn open(&self) {
        self.toggle.open();
    }

    pub fn close(&self) {
        self.toggle.close();
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.toggle.is_open()
    }

    /// Starts a new conversation.
    pub fn refresh(&self) {
        self.pump.refresh();
    }

    #[wasm_bindgen(js_name = isSending)]
    pub fn is_sending(&self) -> bool {
        self.pump.is_sending()
    }

    /// Submits `text` as if typed; resolves with the outcome name
    /// (`replied`, `rate_limited`, `failed`, `busy`, `ignored`, `discarded`).
    pub fn send(&self, text: String) -> js_sys::Promise {
        let pump = self.pump.clone();
        future_to_promise(async move {
            let outcome = pump.submit(&text).await;
            Ok(JsValue::from_str(outcome.as_str()))
        })
    }
}
