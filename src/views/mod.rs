//! List Views
//!
//! Projects, tasks, notifications, deadlines, calendar, recommendations and
//! chat, reflected from the backend.
//!
//! ## Data Flow
//!
//! 1. A gesture calls a [`ViewController`] method
//! 2. The controller issues the REST call
//! 3. The owning collection is re-fetched and applied to [`UiState`]
//! 4. [`render`] turns a state snapshot into display lines

mod controller;
pub mod render;
mod state;

pub use controller::{AssumeYes, Confirm, Outcome, ViewController};
pub use state::{ChatLine, ChatPanel, Modal, Speaker, UiState, CHAT_FAILURE};
