pub mod chat_window;
pub mod launcher;
