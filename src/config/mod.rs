//! Configuration for the `wmark` command
//!
//! Provides types and loading for the `wmark.toml` configuration file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
