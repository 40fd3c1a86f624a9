//! Telegram one-shot sender
//!
//! Signs in to the Telegram client API with a persisted session, sends a
//! single text message to a username and disconnects.

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

// Re-export common types
pub use config::Config;
pub use error::{Error, Result};
pub use session::{SessionLock, TelegramClient};
