use std::cell::Cell;

use crate::pump::FocusInput;

/// Applies the open/closed visual state to the launcher and the window.
pub trait ToggleView: FocusInput {
    fn set_open(&self, open: bool);
}

/// Closed ⇄ Open. Lives as long as the page; conversation resets leave it
/// alone.
pub struct ToggleController<V> {
    view: V,
    open: Cell<bool>,
}

impl<V: ToggleView> ToggleController<V> {
    pub fn new(view: V) -> Self {
        Self { view, open: Cell::new(false) }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Flips the state and returns the new one.
    pub fn toggle(&self) -> bool {
        let open = !self.open.get();
        self.apply(open);
        open
    }

    pub fn open(&self) {
        if !self.is_open() {
            self.apply(true);
        }
    }

    pub fn close(&self) {
        if self.is_open() {
            self.apply(false);
        }
    }

    fn apply(&self, open: bool) {
        self.open.set(open);
        self.view.set_open(open);
        if open {
            self.view.focus_input();
        }
    }
}
