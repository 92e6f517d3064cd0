//! Azure Cosmos DB storage backend.
//!
//! Talks to the SQL API over REST with `reqwest`, signing each request with
//! the account master key.

mod auth;
mod client;
mod container;
mod error;

pub use container::CosmosContainer;
