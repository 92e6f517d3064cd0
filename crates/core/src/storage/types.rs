/// Database holding the items container.
pub const DATABASE_NAME: &str = "SampleDB";

/// Container holding the items.
pub const CONTAINER_NAME: &str = "Items";

/// Partition key path declared on the container.
pub const PARTITION_KEY_PATH: &str = "/id";

/// Provisioned throughput (RU/s) requested when the container is created.
pub const BASELINE_THROUGHPUT: u32 = 400;

/// Desired shape of the database/container pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub database: String,
    pub container: String,
    pub partition_key_path: String,
    pub throughput: u32,
}

impl Default for ContainerDefinition {
    fn default() -> Self {
        Self {
            database: DATABASE_NAME.to_string(),
            container: CONTAINER_NAME.to_string(),
            partition_key_path: PARTITION_KEY_PATH.to_string(),
            throughput: BASELINE_THROUGHPUT,
        }
    }
}

impl ContainerDefinition {
    /// Overrides the database and container names.
    pub fn with_names(mut self, database: impl Into<String>, container: impl Into<String>) -> Self {
        self.database = database.into();
        self.container = container.into();
        self
    }
}

/// Result of an idempotent create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}

impl ProvisionOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            ProvisionOutcome::Created => "created",
            ProvisionOutcome::AlreadyExists => "already exists",
        }
    }
}
