//! Pure functions for deciding whether to seed the container (Functional Core).

use serde_json::json;

use crate::Item;

/// Identifier of the demonstration record inserted on first boot.
pub const SAMPLE_ITEM_ID: &str = "sample-1";

/// What the bootstrapper should do given the container's current item count.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedPlan {
    /// The container is empty, insert the sample item.
    InsertSample(Item),
    /// The container already holds items, leave it alone.
    AlreadySeeded { count: u64 },
}

/// The fixed sample item.
pub fn sample_item() -> Item {
    Item::from_value(json!({
        "id": SAMPLE_ITEM_ID,
        "name": "Sample Item",
        "description": "This is a sample entity created on startup",
        "category": "demo",
        "created_at": "2025-07-31T00:00:00Z"
    }))
    .expect("sample item literal has a string id")
}

/// Pure function: calculate the seed plan for a container holding `count` items.
pub fn plan_seed(count: u64) -> SeedPlan {
    if count == 0 {
        SeedPlan::InsertSample(sample_item())
    } else {
        SeedPlan::AlreadySeeded { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_container_gets_sample() {
        let plan = plan_seed(0);

        match plan {
            SeedPlan::InsertSample(item) => {
                assert_eq!(item.id(), SAMPLE_ITEM_ID);
                assert_eq!(item.get("category"), Some(&json!("demo")));
            }
            other => panic!("expected InsertSample, got {other:?}"),
        }
    }

    #[test]
    fn test_non_empty_container_is_left_alone() {
        assert_eq!(plan_seed(1), SeedPlan::AlreadySeeded { count: 1 });
        assert_eq!(plan_seed(250), SeedPlan::AlreadySeeded { count: 250 });
    }
}
