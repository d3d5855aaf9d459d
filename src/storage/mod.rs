//! Storage layer for season statistics
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Keyed upsert, lookup, listing and season clear

pub mod models;
pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export the main types and store struct for easy access
pub use models::*;
pub use schema::StatStore;
