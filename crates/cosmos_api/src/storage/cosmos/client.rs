//! Cosmos DB REST client (Imperative Shell).

use std::fmt::Write as _;

use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use cosmos_api_core::storage::{ContainerDefinition, ProvisionOutcome, Result, StoreError};

use super::auth::{format_date, MasterKeySigner};
use super::error::{
    map_body_error, map_create_error, map_provisioning_error, map_query_error,
    map_transport_error, ServiceError,
};

/// REST API version sent with every request.
pub const API_VERSION: &str = "2018-12-31";

const CONTINUATION_HEADER: &str = "x-ms-continuation";

/// Kinds of resources addressed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceType {
    Databases,
    Collections,
    Documents,
    PartitionKeyRanges,
}

impl ResourceType {
    fn as_str(self) -> &'static str {
        match self {
            ResourceType::Databases => "dbs",
            ResourceType::Collections => "colls",
            ResourceType::Documents => "docs",
            ResourceType::PartitionKeyRanges => "pkranges",
        }
    }
}

/// A request before signing.
struct CosmosRequest {
    method: Method,
    /// Percent-encoded path appended to the endpoint.
    path: String,
    resource_type: ResourceType,
    /// Unencoded link used in the signature.
    resource_link: String,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl CosmosRequest {
    fn new(
        method: Method,
        resource_type: ResourceType,
        path: String,
        resource_link: String,
    ) -> Self {
        Self {
            method,
            path,
            resource_type,
            resource_link,
            headers: Vec::new(),
            body: None,
        }
    }

    fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn json_body(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string().into_bytes());
        self
    }
}

#[derive(Deserialize)]
struct DocumentFeed {
    #[serde(rename = "Documents", default)]
    documents: Vec<Value>,
}

#[derive(Deserialize)]
struct PartitionKeyRangeFeed {
    #[serde(rename = "PartitionKeyRanges", default)]
    ranges: Vec<PartitionKeyRange>,
}

#[derive(Deserialize)]
struct PartitionKeyRange {
    id: String,
}

/// Thin client over the Cosmos DB SQL API REST surface.
#[derive(Clone)]
pub struct CosmosClient {
    http: reqwest::Client,
    endpoint: String,
    signer: MasterKeySigner,
}

impl CosmosClient {
    /// Creates a client bound to an account endpoint and key.
    ///
    /// `accept_invalid_certs` is meant for the local emulator, which serves a
    /// self-signed certificate.
    pub fn new(endpoint: &str, access_key: &str, accept_invalid_certs: bool) -> Result<Self> {
        let signer = MasterKeySigner::new(access_key)?;
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| StoreError::Provisioning(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            signer,
        })
    }

    /// Creates the database; an existing database is not an error.
    pub async fn create_database(&self, database: &str) -> Result<ProvisionOutcome> {
        let request = CosmosRequest::new(
            Method::POST,
            ResourceType::Databases,
            "dbs".to_string(),
            String::new(),
        )
        .header("content-type", "application/json")
        .json_body(&json!({ "id": database }));

        let response = self.send(request).await?;
        provision_outcome(response, &format!("database '{database}'")).await
    }

    /// Creates the container with its partition key and throughput; an
    /// existing container is not an error.
    pub async fn create_container(
        &self,
        definition: &ContainerDefinition,
    ) -> Result<ProvisionOutcome> {
        let database = &definition.database;
        let request = CosmosRequest::new(
            Method::POST,
            ResourceType::Collections,
            format!("dbs/{}/colls", encode(database)),
            format!("dbs/{database}"),
        )
        .header("content-type", "application/json")
        .header("x-ms-offer-throughput", definition.throughput.to_string())
        .json_body(&json!({
            "id": definition.container,
            "partitionKey": {
                "paths": [definition.partition_key_path],
                "kind": "Hash",
                "version": 2
            }
        }));

        let response = self.send(request).await?;
        provision_outcome(
            response,
            &format!("container '{}/{}'", database, definition.container),
        )
        .await
    }

    /// Lists the ids of the container's partition key ranges.
    pub async fn partition_key_ranges(&self, database: &str, container: &str) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = CosmosRequest::new(
                Method::GET,
                ResourceType::PartitionKeyRanges,
                format!("{}/pkranges", collection_path(database, container)),
                collection_link(database, container),
            );
            if let Some(token) = continuation.take() {
                request = request.header(CONTINUATION_HEADER, token);
            }

            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(map_query_error(ServiceError::from_response(response).await));
            }

            let next = continuation_token(&response);
            let feed: PartitionKeyRangeFeed = response.json().await.map_err(map_body_error)?;
            ids.extend(feed.ranges.into_iter().map(|range| range.id));

            match next {
                Some(token) => continuation = Some(token),
                None => return Ok(ids),
            }
        }
    }

    /// Runs a SQL query and drains every result page.
    ///
    /// Without `partition_key_range` the query fans out across partitions;
    /// with it the query is scoped to that single range.
    pub async fn query_documents(
        &self,
        database: &str,
        container: &str,
        query: &str,
        partition_key_range: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut documents = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = CosmosRequest::new(
                Method::POST,
                ResourceType::Documents,
                format!("{}/docs", collection_path(database, container)),
                collection_link(database, container),
            )
            .header("content-type", "application/query+json")
            .header("x-ms-documentdb-isquery", "True")
            .header("x-ms-documentdb-query-enablecrosspartition", "True")
            .json_body(&json!({ "query": query, "parameters": [] }));

            if let Some(range) = partition_key_range {
                request = request.header("x-ms-documentdb-partitionkeyrangeid", range);
            }
            if let Some(token) = continuation.take() {
                request = request.header(CONTINUATION_HEADER, token);
            }

            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(map_query_error(ServiceError::from_response(response).await));
            }

            let next = continuation_token(&response);
            let feed: DocumentFeed = response.json().await.map_err(map_body_error)?;
            documents.extend(feed.documents);

            match next {
                Some(token) => continuation = Some(token),
                None => return Ok(documents),
            }
        }
    }

    /// Point-reads a document by id within the partition `partition_key`.
    ///
    /// Returns `None` when the gateway answers 404.
    pub async fn read_document(
        &self,
        database: &str,
        container: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>> {
        let request = CosmosRequest::new(
            Method::GET,
            ResourceType::Documents,
            format!("{}/docs/{}", collection_path(database, container), encode(id)),
            format!("{}/docs/{id}", collection_link(database, container)),
        )
        .header(
            "x-ms-documentdb-partitionkey",
            partition_key_header(partition_key),
        );

        let response = self.send(request).await?;
        if response.status().is_success() {
            return response.json().await.map(Some).map_err(map_body_error);
        }

        let err = ServiceError::from_response(response).await;
        if err.is_not_found() {
            Ok(None)
        } else {
            Err(map_query_error(err))
        }
    }

    /// Creates a document and returns it as stored.
    pub async fn create_document(
        &self,
        database: &str,
        container: &str,
        partition_key: &str,
        document: &Value,
    ) -> Result<Value> {
        let request = CosmosRequest::new(
            Method::POST,
            ResourceType::Documents,
            format!("{}/docs", collection_path(database, container)),
            collection_link(database, container),
        )
        .header("content-type", "application/json")
        .header(
            "x-ms-documentdb-partitionkey",
            partition_key_header(partition_key),
        )
        .json_body(document);

        let response = self.send(request).await?;
        if response.status().is_success() {
            return response.json().await.map_err(map_body_error);
        }

        Err(map_create_error(
            ServiceError::from_response(response).await,
            partition_key,
        ))
    }

    /// Signs and sends a request. Only transport failures are errors here;
    /// callers inspect the status.
    async fn send(&self, request: CosmosRequest) -> Result<reqwest::Response> {
        let date = format_date(Utc::now());
        let authorization = self.signer.authorization(
            request.method.as_str(),
            request.resource_type.as_str(),
            &request.resource_link,
            &date,
        );

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "Cosmos DB request"
        );

        let mut builder = self
            .http
            .request(request.method, format!("{}/{}", self.endpoint, request.path))
            .header("authorization", authorization)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION);

        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        builder.send().await.map_err(map_transport_error)
    }
}

async fn provision_outcome(
    response: reqwest::Response,
    resource: &str,
) -> Result<ProvisionOutcome> {
    match response.status() {
        StatusCode::CREATED | StatusCode::OK => Ok(ProvisionOutcome::Created),
        StatusCode::CONFLICT => Ok(ProvisionOutcome::AlreadyExists),
        _ => Err(map_provisioning_error(
            ServiceError::from_response(response).await,
            resource,
        )),
    }
}

fn continuation_token(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTINUATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn collection_path(database: &str, container: &str) -> String {
    format!("dbs/{}/colls/{}", encode(database), encode(container))
}

fn collection_link(database: &str, container: &str) -> String {
    format!("dbs/{database}/colls/{container}")
}

/// Formats a partition key value as the JSON array header the gateway expects.
///
/// Header values must be ASCII, so anything outside that range is written as
/// `\uXXXX` escapes.
fn partition_key_header(value: &str) -> String {
    let json = Value::from(vec![value]).to_string();
    let mut header = String::with_capacity(json.len());

    for ch in json.chars() {
        if ch.is_ascii() {
            header.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                let _ = write!(header, "\\u{unit:04x}");
            }
        }
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::DEFAULT_ACCESS_KEY;

    fn client_for(server: &MockServer) -> CosmosClient {
        CosmosClient::new(&server.uri(), DEFAULT_ACCESS_KEY, false).unwrap()
    }

    #[test]
    fn test_partition_key_header_ascii() {
        assert_eq!(partition_key_header("a1"), r#"["a1"]"#);
        assert_eq!(partition_key_header(r#"qu"ote"#), r#"["qu\"ote"]"#);
    }

    #[test]
    fn test_partition_key_header_escapes_non_ascii() {
        assert_eq!(partition_key_header("caf\u{e9}"), r#"["caf\u00e9"]"#);
        assert_eq!(
            partition_key_header("\u{1f600}"),
            r#"["\ud83d\ude00"]"#
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(
            collection_path("Sample DB", "Items"),
            "dbs/Sample%20DB/colls/Items"
        );
        assert_eq!(
            collection_link("Sample DB", "Items"),
            "dbs/Sample DB/colls/Items"
        );
    }

    #[tokio::test]
    async fn test_create_database_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs"))
            .and(header_exists("authorization"))
            .and(header_exists("x-ms-date"))
            .and(header("x-ms-version", API_VERSION))
            .and(body_json(json!({"id": "SampleDB"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "SampleDB"})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .create_database("SampleDB")
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
    }

    #[tokio::test]
    async fn test_create_database_conflict_is_already_exists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "Conflict",
                "message": "Entity with the specified id already exists in the system."
            })))
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .create_database("SampleDB")
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn test_create_database_unauthorized_is_provisioning_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "Unauthorized",
                "message": "The input authorization token can't serve the request."
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).create_database("SampleDB").await;

        match result {
            Err(StoreError::Provisioning(message)) => {
                assert!(message.starts_with("database 'SampleDB': 401 (Unauthorized)"));
            }
            other => panic!("expected provisioning error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_container_sends_partition_key_and_throughput() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls"))
            .and(header("x-ms-offer-throughput", "400"))
            .and(body_json(json!({
                "id": "Items",
                "partitionKey": {"paths": ["/id"], "kind": "Hash", "version": 2}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "Items"})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server)
            .create_container(&ContainerDefinition::default())
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
    }

    #[tokio::test]
    async fn test_query_follows_continuation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls/Items/docs"))
            .and(header("x-ms-documentdb-isquery", "True"))
            .and(header("x-ms-documentdb-query-enablecrosspartition", "True"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(CONTINUATION_HEADER, "page-2")
                    .set_body_json(json!({"Documents": [{"id": "a"}, {"id": "b"}], "_count": 2})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls/Items/docs"))
            .and(header(CONTINUATION_HEADER, "page-2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Documents": [{"id": "c"}], "_count": 1})),
            )
            .with_priority(1)
            .mount(&server)
            .await;

        let documents = client_for(&server)
            .query_documents("SampleDB", "Items", "SELECT * FROM c", None)
            .await
            .unwrap();

        let ids: Vec<&str> = documents.iter().filter_map(|d| d["id"].as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_query_failure_is_query_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls/Items/docs"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "BadRequest",
                "message": "Syntax error"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .query_documents("SampleDB", "Items", "SELEC * FROM c", None)
            .await;

        assert_eq!(
            result,
            Err(StoreError::QueryFailed(
                "400 (BadRequest): Syntax error".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_partition_key_ranges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/SampleDB/colls/Items/pkranges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "PartitionKeyRanges": [
                    {"id": "0", "minInclusive": "", "maxExclusive": "7F"},
                    {"id": "1", "minInclusive": "7F", "maxExclusive": "FF"}
                ]
            })))
            .mount(&server)
            .await;

        let ranges = client_for(&server)
            .partition_key_ranges("SampleDB", "Items")
            .await
            .unwrap();

        assert_eq!(ranges, vec!["0".to_string(), "1".to_string()]);
    }

    #[tokio::test]
    async fn test_read_document_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/SampleDB/colls/Items/docs/a1"))
            .and(header("x-ms-documentdb-partitionkey", r#"["a1"]"#))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "a1", "name": "x", "_etag": "\"0\""})),
            )
            .mount(&server)
            .await;

        let document = client_for(&server)
            .read_document("SampleDB", "Items", "a1", "a1")
            .await
            .unwrap();

        assert_eq!(document.unwrap()["name"], "x");
    }

    #[tokio::test]
    async fn test_read_document_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/SampleDB/colls/Items/docs/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "NotFound",
                "message": "Entity with the specified id does not exist in the system."
            })))
            .mount(&server)
            .await;

        let document = client_for(&server)
            .read_document("SampleDB", "Items", "missing", "missing")
            .await
            .unwrap();

        assert!(document.is_none());
    }

    #[tokio::test]
    async fn test_create_document_returns_stored_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls/Items/docs"))
            .and(header("x-ms-documentdb-partitionkey", r#"["a1"]"#))
            .and(body_json(json!({"id": "a1", "name": "x"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "a1",
                "name": "x",
                "_rid": "AbCdEf==",
                "_ts": 1722384000
            })))
            .mount(&server)
            .await;

        let stored = client_for(&server)
            .create_document("SampleDB", "Items", "a1", &json!({"id": "a1", "name": "x"}))
            .await
            .unwrap();

        assert_eq!(stored["_rid"], "AbCdEf==");
        assert_eq!(stored["name"], "x");
    }

    #[tokio::test]
    async fn test_create_document_conflict_is_already_exists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/SampleDB/colls/Items/docs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "Conflict",
                "message": "Entity with the specified id already exists in the system."
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_document("SampleDB", "Items", "sample-1", &json!({"id": "sample-1"}))
            .await;

        assert_eq!(
            result,
            Err(StoreError::AlreadyExists {
                id: "sample-1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_failed() {
        let client = CosmosClient::new("http://127.0.0.1:1", DEFAULT_ACCESS_KEY, false).unwrap();

        let result = client.create_database("SampleDB").await;

        assert!(matches!(result, Err(StoreError::ConnectionFailed(_))));
    }
}
