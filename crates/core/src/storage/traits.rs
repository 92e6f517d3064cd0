use async_trait::async_trait;

use crate::Item;

use super::{ContainerDefinition, ProvisionOutcome, Result};

/// Item operations against the provisioned container.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns every item in the container (cross-partition, no ordering).
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Point-reads an item, using `id` as the partition key value.
    async fn get_item(&self, id: &str) -> Result<Option<Item>>;

    /// Inserts a new item and returns it as stored, including any
    /// server-assigned metadata.
    async fn create_item(&self, item: &Item) -> Result<Item>;

    /// Counts all items in the container.
    async fn count_items(&self) -> Result<u64>;
}

/// Idempotent creation of the database and container.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Ensures the database exists.
    async fn ensure_database(&self, definition: &ContainerDefinition) -> Result<ProvisionOutcome>;

    /// Ensures the container exists with the declared partition key and throughput.
    async fn ensure_container(&self, definition: &ContainerDefinition)
        -> Result<ProvisionOutcome>;
}
