//! Telegram notifications for playbook runs.
//!
//! The host engine drives a [`PlaybookCallback`] through the lifecycle of a
//! run; [`TelegramNotifier`] turns those callbacks into Bot API messages.

pub mod callback;
pub mod message;
pub mod notifier;
pub mod table;
pub mod telegram;

pub use callback::{PlaybookCallback, dispatch};
pub use notifier::TelegramNotifier;
