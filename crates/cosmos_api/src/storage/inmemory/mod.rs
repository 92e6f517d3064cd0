//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of the store traits
//! that keeps items in a HashMap wrapped in `Arc<RwLock<_>>`. It also tracks
//! which databases and containers were provisioned so bootstrap can be
//! exercised without a Cosmos DB account.

mod repository;

pub use repository::InMemoryStore;
