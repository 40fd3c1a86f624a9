//! Command implementations

pub mod send_message;

pub use send_message::run as send_message_run;
