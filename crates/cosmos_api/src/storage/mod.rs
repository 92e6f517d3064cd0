//! Storage backend implementations.
//!
//! This module provides concrete implementations of the store traits
//! defined in `cosmos_api_core::storage`:
//!
//! - `cosmos`: Azure Cosmos DB over its REST API, used by the binary
//! - `inmemory`: HashMap-backed store used by the tests

pub mod cosmos;

#[cfg(test)]
pub mod inmemory;

pub use cosmos::CosmosContainer;

#[cfg(test)]
pub use inmemory::InMemoryStore;
