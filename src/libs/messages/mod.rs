//! User-facing text and the macros that print it.
//!
//! All wording lives in the [`Message`] enum so commands never format
//! strings by hand. The `msg_*` macros route output either to the
//! console or, when `EQTRACK_DEBUG` or `RUST_LOG` is set, to `tracing`.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
