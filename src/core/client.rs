//! HTTP client for the CRIPT REST API
//!
//! Thin blocking wrapper around `reqwest`. Every node type lives under
//! `{base}/{kind}/`; searches are plain query-string filters and may come back
//! either as a bare JSON array or as a paginated `{"results": [...], "next": url}`
//! envelope.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::repository::{Filter, NodeKind, Repository};

/// Errors that can occur while talking to the repository
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid host '{host}': {message}")]
    InvalidHost { host: String, message: String },

    #[error("API token contains characters that cannot be sent in a header")]
    InvalidToken,

    #[error("Authentication rejected by {url} (status {status}). Check your API token")]
    Unauthorized { url: String, status: u16 },

    #[error("No {kind} found matching {filter}")]
    NotFound { kind: NodeKind, filter: String },

    #[error("{count} {kind} objects match {filter}, expected exactly one")]
    Ambiguous {
        kind: NodeKind,
        filter: String,
        count: usize,
    },

    #[error("A {kind} matching {filter} already exists")]
    AlreadyExists { kind: NodeKind, filter: String },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("{kind} has no uid; it must be saved or fetched first")]
    MissingUid { kind: NodeKind },

    #[error("Failed to encode {kind}: {source}")]
    Encode {
        kind: NodeKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {kind}: {source}")]
    Decode {
        kind: NodeKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated session against a CRIPT instance
#[derive(Debug)]
pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    /// Build a client for `host` and verify the token with one request to the API root
    pub fn connect(host: &str, token: &str) -> Result<Self, ClientError> {
        let base_url = api_base_url(host)?;

        let mut auth = HeaderValue::from_str(&format!("Token {}", token))
            .map_err(|_| ClientError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("cript-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let client = Self { base_url, http };
        client.verify()?;
        info!(base_url = %client.base_url, "connected");
        Ok(client)
    }

    /// Base URL of the API, e.g. `https://criptapp.org/api`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn verify(&self) -> Result<(), ClientError> {
        let url = format!("{}/", self.base_url);
        self.send(self.http.get(&url)).map(|_| ())
    }

    fn kind_url(&self, kind: NodeKind) -> String {
        format!("{}/{}/", self.base_url, kind.as_str())
    }

    fn node_url(&self, kind: NodeKind, uid: &str) -> String {
        format!("{}/{}/{}/", self.base_url, kind.as_str(), uid)
    }

    /// Send a request and decode the JSON body, mapping HTTP failures to `ClientError`
    fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send()?;
        let status = response.status();
        let url = response.url().to_string();
        debug!(%url, status = status.as_u16(), "response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized {
                url,
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        Ok(response.json()?)
    }
}

impl Repository for HttpClient {
    fn search(&self, kind: NodeKind, filter: &Filter) -> Result<Vec<Value>, ClientError> {
        let url = self.kind_url(kind);
        debug!(%kind, ?filter, "search");

        let mut results = Vec::new();
        let mut page = self.send(self.http.get(&url).query(filter))?;
        loop {
            match page {
                Value::Array(items) => {
                    results.extend(items);
                    break;
                }
                Value::Object(mut envelope) => {
                    match envelope.remove("results") {
                        Some(Value::Array(items)) => results.extend(items),
                        _ => {
                            return Err(ClientError::UnexpectedResponse {
                                url,
                                message: "search response has no 'results' list".to_string(),
                            })
                        }
                    }
                    match envelope.remove("next") {
                        Some(Value::String(next)) => page = self.send(self.http.get(&next))?,
                        _ => break,
                    }
                }
                _ => {
                    return Err(ClientError::UnexpectedResponse {
                        url,
                        message: "search response is neither a list nor a page".to_string(),
                    })
                }
            }
        }

        Ok(results)
    }

    fn create(&self, kind: NodeKind, body: &Value) -> Result<Value, ClientError> {
        debug!(%kind, "create");
        self.send(self.http.post(self.kind_url(kind)).json(body))
    }

    fn update(&self, kind: NodeKind, uid: &str, body: &Value) -> Result<Value, ClientError> {
        debug!(%kind, uid, "update");
        self.send(self.http.put(self.node_url(kind, uid)).json(body))
    }
}

/// Turn a user-supplied host (`criptapp.org`, `https://host/`, `http://localhost:8000/api`)
/// into the API base URL without a trailing slash
pub fn api_base_url(host: &str) -> Result<String, ClientError> {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidHost {
            host: host.to_string(),
            message: "host is empty".to_string(),
        });
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(ClientError::InvalidHost {
            host: host.to_string(),
            message: "host contains whitespace".to_string(),
        });
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    if with_scheme.ends_with("/api") {
        Ok(with_scheme)
    } else {
        Ok(format!("{}/api", with_scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::filter;
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mock API that accepts token `tok` at the root, plus `mocks`
    ///
    /// The blocking client must run outside the runtime, so the server is
    /// started with `block_on` and the runtime is returned to keep it alive.
    fn serve(mocks: Vec<Mock>) -> (Runtime, MockServer) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/"))
                .and(header("authorization", "Token tok"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .mount(&server)
                .await;
            for mock in mocks {
                mock.mount(&server).await;
            }
            server
        });
        (runtime, server)
    }

    #[test]
    fn test_connect_verifies_token() {
        let (_runtime, server) = serve(vec![]);

        let client = HttpClient::connect(&server.uri(), "tok").unwrap();
        assert_eq!(client.base_url(), format!("{}/api", server.uri()));
    }

    #[test]
    fn test_connect_rejected_token_is_unauthorized() {
        let (_runtime, server) = serve(vec![Mock::given(method("GET"))
            .and(path("/api/"))
            .and(header("authorization", "Token wrong"))
            .respond_with(ResponseTemplate::new(401))]);

        let err = HttpClient::connect(&server.uri(), "wrong").unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized { status: 401, .. }));
    }

    #[test]
    fn test_search_bare_list() {
        let (_runtime, server) = serve(vec![Mock::given(method("GET"))
            .and(path("/api/group/"))
            .and(query_param("name", "Polymers Lab"))
            .and(header("authorization", "Token tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"uid": "g1", "name": "Polymers Lab"}])),
            )]);
        let client = HttpClient::connect(&server.uri(), "tok").unwrap();

        let found = client
            .search(NodeKind::Group, &filter([("name", "Polymers Lab")]))
            .unwrap();
        assert_eq!(found, vec![json!({"uid": "g1", "name": "Polymers Lab"})]);
    }

    #[test]
    fn test_search_follows_next_page() {
        let (runtime, server) = serve(vec![]);
        let next = format!("{}/api/material/?page=2", server.uri());
        runtime.block_on(async {
            Mock::given(method("GET"))
                .and(path("/api/material/"))
                .and(query_param("name", "A-db-B_(1)"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "results": [{"uid": "m1"}],
                    "next": next,
                })))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/material/"))
                .and(query_param("page", "2"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "results": [{"uid": "m2"}],
                    "next": null,
                })))
                .mount(&server)
                .await;
        });
        let client = HttpClient::connect(&server.uri(), "tok").unwrap();

        let found = client
            .search(NodeKind::Material, &filter([("name", "A-db-B_(1)")]))
            .unwrap();
        assert_eq!(found, vec![json!({"uid": "m1"}), json!({"uid": "m2"})]);
    }

    #[test]
    fn test_create_posts_body() {
        let body = json!({"name": "A-db-B_(1)", "public": false});
        let (_runtime, server) = serve(vec![Mock::given(method("POST"))
            .and(path("/api/material/"))
            .and(header("authorization", "Token tok"))
            .and(body_json(body.clone()))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"uid": "m1", "name": "A-db-B_(1)"})),
            )]);
        let client = HttpClient::connect(&server.uri(), "tok").unwrap();

        let created = client.create(NodeKind::Material, &body).unwrap();
        assert_eq!(created["uid"], json!("m1"));
    }

    #[test]
    fn test_update_puts_to_node_url() {
        let body = json!({"name": "Run 1", "materials": []});
        let (_runtime, server) = serve(vec![Mock::given(method("PUT"))
            .and(path("/api/inventory/inv-7/"))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(204))]);
        let client = HttpClient::connect(&server.uri(), "tok").unwrap();

        let updated = client.update(NodeKind::Inventory, "inv-7", &body).unwrap();
        assert_eq!(updated, Value::Null);
    }

    #[test]
    fn test_failed_request_reports_status_and_body() {
        let (_runtime, server) = serve(vec![Mock::given(method("POST"))
            .and(path("/api/inventory/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom\n"))]);
        let client = HttpClient::connect(&server.uri(), "tok").unwrap();

        let err = client
            .create(NodeKind::Inventory, &json!({"name": "Run 1"}))
            .unwrap_err();
        match err {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_base_url_adds_scheme_and_api() {
        assert_eq!(
            api_base_url("criptapp.org").unwrap(),
            "https://criptapp.org/api"
        );
    }

    #[test]
    fn test_api_base_url_keeps_explicit_scheme() {
        assert_eq!(
            api_base_url("http://localhost:8000/").unwrap(),
            "http://localhost:8000/api"
        );
        assert_eq!(
            api_base_url("https://criptapp.org/api/").unwrap(),
            "https://criptapp.org/api"
        );
    }

    #[test]
    fn test_api_base_url_rejects_empty() {
        assert!(matches!(
            api_base_url("  "),
            Err(ClientError::InvalidHost { .. })
        ));
        assert!(matches!(
            api_base_url("cript app.org"),
            Err(ClientError::InvalidHost { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::NotFound {
            kind: NodeKind::Group,
            filter: "name=Polymers".to_string(),
        };
        assert_eq!(err.to_string(), "No group found matching name=Polymers");

        let err = ClientError::Ambiguous {
            kind: NodeKind::Collection,
            filter: "name=X".to_string(),
            count: 2,
        };
        assert!(err.to_string().contains("expected exactly one"));
    }
}
