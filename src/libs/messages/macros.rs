//! Output macros for [`Message`](super::Message) values.
//!
//! In debug mode (`EQTRACK_DEBUG` or `RUST_LOG` set) every message becomes a
//! `tracing` event so it lands in the log file next to store diagnostics.
//! Otherwise messages go to stdout, errors to stderr.
//!
//! ```rust,no_run
//! use eqtrack::libs::messages::Message;
//! use eqtrack::{msg_info, msg_success};
//!
//! msg_success!(Message::WorkSaved);
//! msg_info!(Message::ListStatus(12, 9, 9), true);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("EQTRACK_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Plain,
    Success,
    Info,
    Warning,
    Error,
}

#[doc(hidden)]
pub fn emit(level: Level, text: &dyn std::fmt::Display, padded: bool) {
    let prefix = match level {
        Level::Plain => "",
        Level::Success => "✅ ",
        Level::Info => "ℹ️ ",
        Level::Warning => "⚠️ ",
        Level::Error => "❌ ",
    };
    let line = if padded {
        format!("\n{}{}\n", prefix, text)
    } else {
        format!("{}{}", prefix, text)
    };

    if is_debug_mode() {
        match level {
            Level::Error => tracing::error!("{}", line),
            Level::Warning => tracing::warn!("{}", line),
            _ => tracing::info!("{}", line),
        }
    } else if level == Level::Error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Plain, &$msg, false)
    };
    ($msg:expr, true) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Plain, &$msg, true)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Success, &$msg, false)
    };
    ($msg:expr, true) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Success, &$msg, true)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Info, &$msg, false)
    };
    ($msg:expr, true) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Info, &$msg, true)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Warning, &$msg, false)
    };
    ($msg:expr, true) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Warning, &$msg, true)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Error, &$msg, false)
    };
    ($msg:expr, true) => {
        $crate::libs::messages::macros::emit($crate::libs::messages::macros::Level::Error, &$msg, true)
    };
}

/// Debug-only output, silent unless debug mode is on.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Builds an `anyhow::Error` carrying the message text.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` carrying the message text.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
