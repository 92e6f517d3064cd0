//! Cosmos DB implementation of the store traits from `cosmos_api_core::storage`.

use async_trait::async_trait;
use serde_json::Value;

use cosmos_api_core::storage::{
    ContainerDefinition, ItemStore, ProvisionOutcome, Provisioner, Result,
};
use cosmos_api_core::Item;

use super::client::CosmosClient;
use super::error::map_body_error;
use crate::config::Config;

const SELECT_ALL: &str = "SELECT * FROM c";
const COUNT_ALL: &str = "SELECT VALUE COUNT(1) FROM c";

/// Handle to one database/container pair.
pub struct CosmosContainer {
    client: CosmosClient,
    database: String,
    container: String,
}

impl CosmosContainer {
    /// Creates a handle with the given client and names.
    pub fn new(
        client: CosmosClient,
        database: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            client,
            database: database.into(),
            container: container.into(),
        }
    }

    /// Builds the client from configuration.
    ///
    /// Only the local part of client construction happens here (key decoding,
    /// TLS setup); no request is sent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = CosmosClient::new(
            &config.endpoint,
            &config.access_key,
            config.accept_invalid_certs,
        )?;

        Ok(Self::new(
            client,
            &config.database_name,
            &config.container_name,
        ))
    }
}

fn to_item(document: Value) -> Result<Item> {
    Item::from_value(document).map_err(map_body_error)
}

#[async_trait]
impl ItemStore for CosmosContainer {
    async fn list_items(&self) -> Result<Vec<Item>> {
        self.client
            .query_documents(&self.database, &self.container, SELECT_ALL, None)
            .await?
            .into_iter()
            .map(to_item)
            .collect()
    }

    async fn get_item(&self, id: &str) -> Result<Option<Item>> {
        self.client
            .read_document(&self.database, &self.container, id, id)
            .await?
            .map(to_item)
            .transpose()
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        let document = Value::Object(item.fields().clone());
        let stored = self
            .client
            .create_document(&self.database, &self.container, item.id(), &document)
            .await?;

        to_item(stored)
    }

    /// Aggregates cannot be merged by the gateway across partition key
    /// ranges, so the count runs once per range and the partials are summed.
    async fn count_items(&self) -> Result<u64> {
        let ranges = self
            .client
            .partition_key_ranges(&self.database, &self.container)
            .await?;

        let mut total = 0u64;
        for range in &ranges {
            let partials = self
                .client
                .query_documents(&self.database, &self.container, COUNT_ALL, Some(range))
                .await?;
            total += partials.iter().filter_map(Value::as_u64).sum::<u64>();
        }

        Ok(total)
    }
}

#[async_trait]
impl Provisioner for CosmosContainer {
    async fn ensure_database(&self, definition: &ContainerDefinition) -> Result<ProvisionOutcome> {
        self.client.create_database(&definition.database).await
    }

    async fn ensure_container(
        &self,
        definition: &ContainerDefinition,
    ) -> Result<ProvisionOutcome> {
        self.client.create_container(definition).await
    }
}
