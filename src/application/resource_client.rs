//! Generic resource client
//!
//! One client serves every collection in the catalog; the `Resource`
//! descriptor supplies the path template and list flags. Each method issues
//! exactly one request and returns the raw response, whatever its status.

use serde_json::Value;
use tracing::info;

use crate::api_client::{ApiResponse, SentinelClient};
use crate::error::CliResult;
use crate::resources::{ENTRY_POINTS, POLICY_ASSETS, Resource};

pub struct ResourceClient<'a> {
    client: &'a SentinelClient,
    resource: &'static Resource,
}

impl<'a> ResourceClient<'a> {
    pub fn new(client: &'a SentinelClient, resource: &'static Resource) -> Self {
        Self { client, resource }
    }

    /// List the collection, or a single record when `id` is given.
    ///
    /// For scoped collections (vulnerability classes) the ID is the scope and
    /// must be present; the caller validates that.
    pub async fn list(&self, id: Option<u64>) -> CliResult<ApiResponse> {
        if let Some(id) = id {
            info!("{} => {}", self.resource.id_name, id);
        }
        let path = self.resource.path_for(id, None, self.resource.list_flags);
        self.client.get(&path).await
    }

    pub async fn create(&self, payload: &Value) -> CliResult<ApiResponse> {
        let path = self.resource.path_for(None, None, &[]);
        self.client.post(&path, payload).await
    }

    pub async fn update(&self, id: u64, payload: &Value) -> CliResult<ApiResponse> {
        info!("{} => {}", self.resource.id_name, id);
        let path = self.resource.path_for(Some(id), None, &[]);
        self.client.put(&path, payload).await
    }

    pub async fn delete(&self, id: u64) -> CliResult<ApiResponse> {
        info!("{} => {}", self.resource.id_name, id);
        let path = self.resource.path_for(Some(id), None, &[]);
        self.client.delete(&path).await
    }

    /// Replace the set of sites/applications a policy is applied to
    pub async fn apply(&self, id: u64, assets: &Value) -> CliResult<ApiResponse> {
        info!("{} => {}", self.resource.id_name, id);
        let path = self.resource.path_for(Some(id), Some(POLICY_ASSETS), &[]);
        self.client.put(&path, assets).await
    }

    /// Fetch the sites/applications a policy is applied to
    pub async fn fetch(&self, id: u64) -> CliResult<ApiResponse> {
        info!("{} => {}", self.resource.id_name, id);
        let path = self.resource.path_for(Some(id), Some(POLICY_ASSETS), &[]);
        self.client.get(&path).await
    }

    pub async fn entry_points(&self, id: u64) -> CliResult<ApiResponse> {
        info!("{} => {}", self.resource.id_name, id);
        let path = self.resource.path_for(Some(id), Some(ENTRY_POINTS), &[]);
        self.client.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ConnectionConfig;
    use crate::resources::{APP, SITE, USER, VULN_CLASS, VULN_POLICY};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> SentinelClient {
        SentinelClient::new(&ConnectionConfig {
            host: format!("http://{}", server.host()),
            port: server.port(),
            api_key: Some("test-key".to_string()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_resource_flags() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/site")
                    .query_param("format", "json")
                    .query_param("display_scan_status", "1")
                    .query_param("key", "test-key");
                then.status(200).body(r#"{"sites": []}"#);
            })
            .await;

        let client = client_for(&server);
        let response = ResourceClient::new(&client, &SITE).list(None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_list_single_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/user/17");
                then.status(200).body(r#"{"id": "17", "username": "jdoe"}"#);
            })
            .await;

        let client = client_for(&server);
        let response = ResourceClient::new(&client, &USER)
            .list(Some(17))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.json().unwrap()["username"], "jdoe");
    }

    #[tokio::test]
    async fn test_vuln_classes_are_scoped_by_client() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/1234/vuln_policy/all_vuln_classes")
                    .query_param("format", "json");
                then.status(200).body(r#"{"all_vuln_classes": [{"id": 1}]}"#);
            })
            .await;

        let client = client_for(&server);
        ResourceClient::new(&client, &VULN_CLASS)
            .list(Some(1234))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_write_verbs() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/vuln_custom_policy")
                    .json_body(json!({"name": "p"}));
                then.status(201).body(r#"{"id": 5, "name": "p"}"#);
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/vuln_custom_policy/5")
                    .json_body(json!({"description": "d"}));
                then.status(200).body(r#"{"id": 5, "description": "d"}"#);
            })
            .await;
        let apply = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/vuln_custom_policy/5/assets")
                    .json_body(json!({"sites": [1], "applications": []}));
                then.status(200).body(r#"{"sites": [1], "applications": []}"#);
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/vuln_custom_policy/5");
                then.status(200).body("{}");
            })
            .await;

        let client = client_for(&server);
        let policies = ResourceClient::new(&client, &VULN_POLICY);

        assert_eq!(policies.create(&json!({"name": "p"})).await.unwrap().status, 201);
        assert_eq!(
            policies
                .update(5, &json!({"description": "d"}))
                .await
                .unwrap()
                .status,
            200
        );
        assert_eq!(
            policies
                .apply(5, &json!({"sites": [1], "applications": []}))
                .await
                .unwrap()
                .status,
            200
        );
        assert_eq!(policies.delete(5).await.unwrap().status, 200);

        create.assert_async().await;
        update.assert_async().await;
        apply.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_entry_points() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/application/8/entry_points");
                then.status(200).body(r#"{"entry_points": []}"#);
            })
            .await;

        let client = client_for(&server);
        ResourceClient::new(&client, &APP)
            .entry_points(8)
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
