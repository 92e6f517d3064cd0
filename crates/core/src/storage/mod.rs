mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use traits::{ItemStore, Provisioner};
pub use types::{
    ContainerDefinition, ProvisionOutcome, BASELINE_THROUGHPUT, CONTAINER_NAME, DATABASE_NAME,
    PARTITION_KEY_PATH,
};
