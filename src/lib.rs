//! Data-access layer for the LightBnB rental listings.
//!
//! Every query runs with positional parameters over one shared PostgreSQL
//! connection ([`db::Database`]). Property search builds its `WHERE` clause
//! at runtime from a [`db::PropertyFilter`].

pub mod config; // Connection settings from the environment
pub mod db; // Connection, models, query builder and queries
pub mod telemetry; // Logging subscriber setup

pub use config::{Config, ConfigError};
pub use db::Database;
