//! In-memory item store implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use cosmos_api_core::storage::{
    ContainerDefinition, ItemStore, ProvisionOutcome, Provisioner, Result, StoreError,
};
use cosmos_api_core::Item;

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<HashMap<String, Item>>>,
    databases: Arc<RwLock<HashSet<String>>>,
    containers: Arc<RwLock<HashSet<(String, String)>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`.
    pub async fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let store = Self::new();
        {
            let mut stored = store.items.write().await;
            for item in items {
                stored.insert(item.id().to_string(), item);
            }
        }
        store
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn list_items(&self) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(id).cloned())
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        let mut items = self.items.write().await;
        if items.contains_key(item.id()) {
            return Err(StoreError::AlreadyExists {
                id: item.id().to_string(),
            });
        }

        // Mirror the server-assigned timestamp Cosmos DB adds to every document.
        let mut fields = item.fields().clone();
        fields.insert(
            "_ts".to_string(),
            Value::from(chrono::Utc::now().timestamp()),
        );
        let stored = Item::from_map(fields)?;

        items.insert(stored.id().to_string(), stored.clone());
        Ok(stored)
    }

    async fn count_items(&self) -> Result<u64> {
        let items = self.items.read().await;
        Ok(items.len() as u64)
    }
}

#[async_trait]
impl Provisioner for InMemoryStore {
    async fn ensure_database(&self, definition: &ContainerDefinition) -> Result<ProvisionOutcome> {
        let mut databases = self.databases.write().await;
        if databases.insert(definition.database.clone()) {
            Ok(ProvisionOutcome::Created)
        } else {
            Ok(ProvisionOutcome::AlreadyExists)
        }
    }

    async fn ensure_container(
        &self,
        definition: &ContainerDefinition,
    ) -> Result<ProvisionOutcome> {
        if !self.databases.read().await.contains(&definition.database) {
            return Err(StoreError::Provisioning(format!(
                "database '{}' does not exist",
                definition.database
            )));
        }

        let mut containers = self.containers.write().await;
        let key = (definition.database.clone(), definition.container.clone());
        if containers.insert(key) {
            Ok(ProvisionOutcome::Created)
        } else {
            Ok(ProvisionOutcome::AlreadyExists)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        Item::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryStore::new();

        let stored = store
            .create_item(&item(json!({"id": "a1", "name": "x"})))
            .await
            .unwrap();
        let fetched = store.get_item("a1").await.unwrap().unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.get("name"), Some(&json!("x")));
        assert!(fetched.get("_ts").is_some());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryStore::new();
        store.create_item(&item(json!({"id": "a1"}))).await.unwrap();

        let result = store.create_item(&item(json!({"id": "a1"}))).await;

        assert_eq!(
            result,
            Err(StoreError::AlreadyExists {
                id: "a1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_count_and_list() {
        let store = InMemoryStore::with_items([
            item(json!({"id": "a"})),
            item(json!({"id": "b"})),
            item(json!({"id": "c"})),
        ])
        .await;

        assert_eq!(store.count_items().await.unwrap(), 3);
        assert_eq!(store.list_items().await.unwrap().len(), 3);
        assert!(store.get_item("z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let store = InMemoryStore::new();
        let definition = ContainerDefinition::default();

        assert_eq!(
            store.ensure_database(&definition).await.unwrap(),
            ProvisionOutcome::Created
        );
        assert_eq!(
            store.ensure_container(&definition).await.unwrap(),
            ProvisionOutcome::Created
        );
        assert_eq!(
            store.ensure_database(&definition).await.unwrap(),
            ProvisionOutcome::AlreadyExists
        );
        assert_eq!(
            store.ensure_container(&definition).await.unwrap(),
            ProvisionOutcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_container_requires_database() {
        let store = InMemoryStore::new();

        let result = store
            .ensure_container(&ContainerDefinition::default())
            .await;

        assert!(matches!(result, Err(StoreError::Provisioning(_))));
    }
}
