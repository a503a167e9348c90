//! # eqtrack
//!
//! Inventory tracking for an avionics test-bench workshop: units enter the
//! shop, are worked on and documented, get closed out and finally leave the
//! inventory.
//!
//! ```rust,no_run
//! use eqtrack::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
