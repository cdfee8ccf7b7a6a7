//! API Client - HTTP client for Sentinel server communication
//!
//! Four verb wrappers (GET, POST, PUT, DELETE) share one request path:
//! - the API key travels as the `key` query parameter on every request
//! - POST/PUT bodies are serialized JSON with a byte-accurate content length
//! - the whole body is buffered and handed back with the status code
//!
//! Non-2xx statuses are returned as ordinary responses; callers decide what
//! counts as failure. Server certificates are not validated.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::{
    API_KEY_PARAM, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    USER_AGENT,
};
use crate::error::{CliError, CliResult};

/// Where and how to reach the Sentinel service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
        }
    }
}

/// Status code and buffered body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> CliResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| CliError::ResponseParse(e.to_string()))
    }

    /// Turn a non-2xx response into `CliError::HttpStatus`
    pub fn error_for_status(self) -> CliResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CliError::from_status(self.status, &self.body))
        }
    }
}

/// API client for the Sentinel server
#[derive(Clone)]
pub struct SentinelClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SentinelClient {
    /// Create a new API client
    pub fn new(config: &ConnectionConfig) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(&config.host, config.port),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub async fn get(&self, path: &str) -> CliResult<ApiResponse> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> CliResult<ApiResponse> {
        self.execute(Method::POST, path, Some(payload)).await
    }

    pub async fn put(&self, path: &str, payload: &Value) -> CliResult<ApiResponse> {
        self.execute(Method::PUT, path, Some(payload)).await
    }

    pub async fn delete(&self, path: &str) -> CliResult<ApiResponse> {
        self.execute(Method::DELETE, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> CliResult<ApiResponse> {
        let api_key = self.api_key.as_deref().ok_or(CliError::MissingApiKey)?;

        let url = request_url(&self.base_url, path, api_key)?;
        debug!(
            "Outbound request => {} {}",
            method,
            request_url(&self.base_url, path, "****")?
        );

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(payload) = payload {
            let body = payload.to_string().into_bytes();
            debug!("Outbound payload => {}", String::from_utf8_lossy(&body));
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .header(CONTENT_LENGTH, body.len())
                .body(body);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        info!("Status Code => {}", status);
        debug!("Response Headers => {:?}", response.headers());

        let body = response.text().await?;
        debug!("raw data => {}", body);

        Ok(ApiResponse { status, body })
    }
}

/// Construct the base URL from host and port.
///
/// A host without a scheme is reached over HTTPS. The port is only spelled
/// out when it differs from the scheme's default.
pub fn base_url(host: &str, port: u16) -> String {
    let host = host.trim_end_matches('/');
    let (scheme, bare) = if let Some(rest) = host.strip_prefix("http://") {
        ("http", rest)
    } else if let Some(rest) = host.strip_prefix("https://") {
        ("https", rest)
    } else {
        ("https", host)
    };

    let default_port = if scheme == "http" { 80 } else { 443 };
    if port == default_port {
        format!("{}://{}", scheme, bare)
    } else {
        format!("{}://{}:{}", scheme, bare, port)
    }
}

/// Join `path` onto the base URL and append the percent-encoded
/// `key=<api_key>` query pair after any existing query string
pub fn request_url(base_url: &str, path: &str, api_key: &str) -> CliResult<Url> {
    let path = path.trim_start_matches('/');
    let raw = format!("{}/{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw)
        .map_err(|e| CliError::Config(format!("invalid request URL {}: {}", raw, e)))?;
    url.query_pairs_mut().append_pair(API_KEY_PARAM, api_key);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer, api_key: Option<&str>) -> ConnectionConfig {
        ConnectionConfig {
            host: format!("http://{}", server.host()),
            port: server.port(),
            api_key: api_key.map(String::from),
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            base_url("sentinel.whitehatsec.com", 443),
            "https://sentinel.whitehatsec.com"
        );
        assert_eq!(base_url("localhost", 8443), "https://localhost:8443");
        assert_eq!(base_url("http://127.0.0.1/", 8080), "http://127.0.0.1:8080");
        assert_eq!(base_url("http://example.com", 80), "http://example.com");
    }

    #[test]
    fn test_request_url() {
        let base = "https://sentinel.whitehatsec.com";
        assert_eq!(
            request_url(base, "/api/user", "abc").unwrap().as_str(),
            "https://sentinel.whitehatsec.com/api/user?key=abc"
        );
        assert_eq!(
            request_url(base, "api/user?format=json", "abc").unwrap().as_str(),
            "https://sentinel.whitehatsec.com/api/user?format=json&key=abc"
        );
    }

    #[test]
    fn test_request_url_encodes_reserved_characters_in_key() {
        let url = request_url("http://127.0.0.1:8080", "/api/user?format=json", "ab#c&d+e%").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(
            url.query(),
            Some("format=json&key=ab%23c%26d%2Be%25")
        );
        let key = url
            .query_pairs()
            .find(|(name, _)| name == "key")
            .map(|(_, value)| value.into_owned());
        assert_eq!(key.as_deref(), Some("ab#c&d+e%"));
    }

    #[tokio::test]
    async fn test_api_key_with_reserved_characters_reaches_server_intact() {
        let server = MockServer::start_async().await;
        let exact = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/user")
                    .query_param("format", "json")
                    .query_param("key", "ab#c&d+e");
                then.status(200).body("[]");
            })
            .await;

        let client = SentinelClient::new(&config_for(&server, Some("ab#c&d+e"))).unwrap();
        let response = client.get("/api/user?format=json").await.unwrap();

        exact.assert_async().await;
        assert_eq!(response.status, 200);
    }

    #[test]
    fn test_empty_api_key_is_treated_as_missing() {
        let client = SentinelClient::new(&ConnectionConfig {
            api_key: Some(String::new()),
            ..ConnectionConfig::default()
        })
        .unwrap();
        assert!(client.api_key.is_none());
    }

    #[tokio::test]
    async fn test_get_sends_api_key_as_query_parameter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/user")
                    .query_param("format", "json")
                    .query_param("key", "test-key")
                    .header("accept", "application/json");
                then.status(200).body(r#"[{"id": 1}]"#);
            })
            .await;

        let client = SentinelClient::new(&config_for(&server, Some("test-key"))).unwrap();
        let response = client.get("/api/user?format=json").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap()[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_sending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let client = SentinelClient::new(&config_for(&server, None)).unwrap();
        let result = client.get("/api/user?format=json").await;

        assert!(matches!(result, Err(CliError::MissingApiKey)));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_post_sends_json_with_exact_content_length() {
        let payload = json!({"name": "Café policy", "risk_scores": []});
        let expected_len = serde_json::to_vec(&payload).unwrap().len().to_string();

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/vuln_custom_policy")
                    .query_param("key", "k")
                    .header("content-type", "application/json")
                    .header("content-length", expected_len.as_str())
                    .json_body(json!({"name": "Café policy", "risk_scores": []}));
                then.status(201).body(r#"{"id": 7}"#);
            })
            .await;

        let client = SentinelClient::new(&config_for(&server, Some("k"))).unwrap();
        let response = client
            .post("api/vuln_custom_policy", &payload)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_not_raised() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/vuln_custom_policy/3");
                then.status(405).body(r#"{"message": "policy in use"}"#);
            })
            .await;

        let client = SentinelClient::new(&config_for(&server, Some("k"))).unwrap();
        let response = client.delete("/api/vuln_custom_policy/3").await.unwrap();

        assert_eq!(response.status, 405);
        assert!(!response.is_success());
        let err = response.error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "405 => policy in use");
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = SentinelClient::new(&ConnectionConfig {
            host: "http://127.0.0.1".to_string(),
            port: 1,
            api_key: Some("k".to_string()),
        })
        .unwrap();

        let result = client.get("/api/user").await;
        assert!(matches!(result, Err(CliError::Transport(_))));
    }
}
