//! Functional core for the Cosmos DB items API.
//!
//! Everything in this crate is free of I/O: the item type, the storage
//! traits implemented by the service crate, the error taxonomy and its HTTP
//! mapping, seed planning and the health report payload.

pub mod health;
pub mod item;
pub mod seed;
pub mod storage;

pub use health::HealthReport;
pub use item::{Item, ItemError};
pub use seed::{plan_seed, sample_item, SeedPlan, SAMPLE_ITEM_ID};
