//! Startup provisioning and seeding.
//!
//! Runs before the listener is bound. Provisioning failures are fatal and
//! propagate to `main`; seeding failures are logged and swallowed.

use cosmos_api_core::storage::{ContainerDefinition, ItemStore, Provisioner, Result};
use cosmos_api_core::{plan_seed, SeedPlan};

/// Ensure the database and container exist, then seed the sample item.
pub async fn initialize<S>(store: &S, definition: &ContainerDefinition) -> Result<()>
where
    S: ItemStore + Provisioner,
{
    let outcome = store.ensure_database(definition).await?;
    tracing::info!(
        database = %definition.database,
        outcome = outcome.describe(),
        "Database ready"
    );

    let outcome = store.ensure_container(definition).await?;
    tracing::info!(
        database = %definition.database,
        container = %definition.container,
        partition_key = %definition.partition_key_path,
        throughput = definition.throughput,
        outcome = outcome.describe(),
        "Container ready"
    );

    seed(store).await;

    Ok(())
}

/// Insert the sample item if the container is empty.
///
/// Never fails: a concurrent replica may have seeded first, in which case the
/// insert conflicts and is ignored like any other seeding error.
pub async fn seed<S>(store: &S)
where
    S: ItemStore + ?Sized,
{
    if let Err(e) = try_seed(store).await {
        tracing::warn!(error = %e, "Failed to seed sample item");
    }
}

async fn try_seed<S>(store: &S) -> Result<()>
where
    S: ItemStore + ?Sized,
{
    let count = store.count_items().await?;

    match plan_seed(count) {
        SeedPlan::InsertSample(item) => {
            store.create_item(&item).await?;
            tracing::info!(id = %item.id(), "Sample item added to container");
        }
        SeedPlan::AlreadySeeded { count } => {
            tracing::info!(count, "Container already contains items, skipping seed");
        }
    }

    Ok(())
}
