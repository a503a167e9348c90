//! Domain types, rules and helpers behind the eqtrack commands.
//!
//! - **Domain**: equipment records, validators, lifecycle rules
//! - **Workshop**: bench operations combining rules, filing and the store
//! - **Output**: list views, exports, PDF report, statistics, notifications
//! - **Infrastructure**: configuration, data storage, secrets, backups,
//!   background jobs, user messages

pub mod background;
pub mod backup;
pub mod config;
pub mod data_storage;
pub mod equipment;
pub mod export;
pub mod filing;
pub mod formatter;
pub mod lifecycle;
pub mod messages;
pub mod notify;
pub mod report;
pub mod secret;
pub mod settings;
pub mod stats;
pub mod validators;
pub mod view;
pub mod workshop;
