use std::{env, fmt};

use cosmos_api_core::storage::{ContainerDefinition, CONTAINER_NAME, DATABASE_NAME};

/// Environment variable holding the Cosmos DB account endpoint.
pub const ENDPOINT_VAR: &str = "ConnectionStrings__cosmos-db__AccountEndpoint";
/// Environment variable holding the Cosmos DB account key.
pub const ACCESS_KEY_VAR: &str = "ConnectionStrings__cosmos-db__AccountKey";
/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "PORT";
/// Environment variable forcing (or disabling) acceptance of self-signed certificates.
pub const ACCEPT_INVALID_CERTS_VAR: &str = "COSMOS_ACCEPT_INVALID_CERTS";

/// Local emulator endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:8081";
/// Published key of the local emulator. Development only.
pub const DEFAULT_ACCESS_KEY: &str =
    "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";
pub const DEFAULT_PORT: u16 = 8000;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Cosmos DB account endpoint (default: local emulator)
    pub endpoint: String,
    /// Base64 account key (default: emulator key)
    pub access_key: String,
    /// Database name (fixed: "SampleDB")
    pub database_name: String,
    /// Container name (fixed: "Items")
    pub container_name: String,
    /// Port to listen on (default: 8000)
    pub listen_port: u16,
    /// Skip TLS certificate validation (default: true for localhost endpoints)
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ConnectionStrings__cosmos-db__AccountEndpoint` - account endpoint
    /// - `ConnectionStrings__cosmos-db__AccountKey` - account key
    /// - `PORT` - listen port (default: 8000)
    /// - `COSMOS_ACCEPT_INVALID_CERTS` - `true`/`false` (default: true for localhost)
    pub fn from_env() -> Self {
        let endpoint = env::var(ENDPOINT_VAR).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let accept_invalid_certs = env::var(ACCEPT_INVALID_CERTS_VAR)
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or_else(|| is_local_endpoint(&endpoint));

        Self {
            access_key: env::var(ACCESS_KEY_VAR).unwrap_or_else(|_| DEFAULT_ACCESS_KEY.to_string()),
            database_name: DATABASE_NAME.to_string(),
            container_name: CONTAINER_NAME.to_string(),
            listen_port: env::var(PORT_VAR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            accept_invalid_certs,
            endpoint,
        }
    }

    /// Override the listen port (from the command line).
    pub fn with_listen_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.listen_port = port;
        }
        self
    }

    /// The database/container pair to provision.
    pub fn container_definition(&self) -> ContainerDefinition {
        ContainerDefinition::default().with_names(&self.database_name, &self.container_name)
    }

    /// Returns a display string for the target account.
    pub fn target_display(&self) -> String {
        if is_local_endpoint(&self.endpoint) {
            format!("Cosmos DB emulator ({})", self.endpoint)
        } else {
            format!("Cosmos DB ({})", self.endpoint)
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"<redacted>")
            .field("database_name", &self.database_name)
            .field("container_name", &self.container_name)
            .field("listen_port", &self.listen_port)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn is_local_endpoint(endpoint: &str) -> bool {
    url::Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
}
