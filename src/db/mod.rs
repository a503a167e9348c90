//! SQLite persistence.
//!
//! ```rust,no_run
//! use eqtrack::db::{db::Db, equipments::{Equipments, ListFilter}};
//!
//! # fn main() -> anyhow::Result<()> {
//! let db = Db::open("control_equipos.db")?;
//! let records = Equipments::new(&db).list(&ListFilter::default())?;
//! # Ok(())
//! # }
//! ```

/// Connection handle and generic query helpers.
pub mod db;

/// Versioned schema changes, including the import of legacy serialized lists.
pub mod migrations;

/// The `equipos` table and its intervention and attachment children.
pub mod equipments;
