use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced when turning a JSON payload into an [`Item`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("Item must be a JSON object")]
    NotAnObject,
    #[error("Item must have an 'id' field")]
    MissingId,
    #[error("Item 'id' must be a non-empty string")]
    InvalidId,
}

/// A stored document.
///
/// Items are open-ended JSON objects. The only constrained field is `id`,
/// which is a non-empty string and doubles as the partition key value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Item {
    fields: Map<String, Value>,
}

impl Item {
    /// Builds an item from a JSON object, checking the `id` field.
    pub fn from_map(fields: Map<String, Value>) -> Result<Self, ItemError> {
        match fields.get("id") {
            None => Err(ItemError::MissingId),
            Some(Value::String(id)) if !id.is_empty() => Ok(Self { fields }),
            Some(_) => Err(ItemError::InvalidId),
        }
    }

    /// Builds an item from any JSON value. Non-objects are rejected.
    pub fn from_value(value: Value) -> Result<Self, ItemError> {
        match value {
            Value::Object(fields) => Self::from_map(fields),
            _ => Err(ItemError::NotAnObject),
        }
    }

    /// The item's identifier, which is also its partition key value.
    pub fn id(&self) -> &str {
        self.fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Looks up a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Item {
    type Error = ItemError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_map(fields)
    }
}

impl From<Item> for Map<String, Value> {
    fn from(item: Item) -> Self {
        item.fields
    }
}
