//! Schema loading functionality
//!
//! Provides high-level operations for loading schema fragments from
//! storage backends into a schema store.

pub mod loader;

pub use loader::{LoadError, SchemaLoader};
