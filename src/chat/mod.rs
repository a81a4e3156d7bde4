//! Multi-session AI chat
//!
//! [`ChatSessionStore`] is the synchronous state machine that owns the
//! session list, the active pointer and the in-flight markers, and mirrors
//! every change to a [`KeyValueStore`](crate::storage::KeyValueStore).
//! [`ChatService`] wraps it for async callers and drives a send through the
//! configured [`Provider`](crate::providers::Provider).

pub mod clock;
pub mod markup;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use markup::normalize_markup;
pub use service::ChatService;
pub use store::{
    load_from_storage, ChatSessionStore, PendingSend, Rejection, SendOutcome, SendStart,
};
pub use types::{derive_title, ChatSession, Message, Role, DEFAULT_TITLE, DEFAULT_TITLE_MAX_CHARS};
