//! Roadmap acquisition.
//!
//! [`Acquirer::acquire`] asks a [`RemoteGenerator`] for a roadmap and falls
//! back to the local generator on any failure. It never returns an error:
//! the caller always gets a tree, and [`Source`] records which path made it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tree::{Node, SchemaError, parse_node};

mod local;

pub use local::{generate_local, now_millis};

/// Which generator produced a roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Llm,
    Local,
}

/// Body of a generate request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Body of a successful generate response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acquired {
    pub root: Node,
    pub source: Source,
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generator answered with status {0}")]
    Status(u16),
    #[error("response has no root")]
    MissingRoot,
    #[error("response root is malformed: {0}")]
    Schema(#[from] SchemaError),
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RemoteGenerator {
    async fn generate(&self, topic: &str, level: &str) -> Result<Acquired, AcquireError>;
}

/// Remote generator reached over HTTP (`POST {endpoint}` with
/// `{topic, level}`).
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

/// Decode a generate response body, validating the tree before accepting it.
pub fn decode_response(body: Value) -> Result<Acquired, AcquireError> {
    let Value::Object(mut map) = body else {
        return Err(AcquireError::MissingRoot);
    };
    let root = match map.remove("root") {
        Some(v) if !v.is_null() => v,
        _ => return Err(AcquireError::MissingRoot),
    };
    let root = parse_node(root)?;
    let source = map
        .remove("source")
        .and_then(|s| serde_json::from_value(s).ok())
        .unwrap_or(Source::Llm);
    Ok(Acquired { root, source })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RemoteGenerator for HttpRemote {
    async fn generate(&self, topic: &str, level: &str) -> Result<Acquired, AcquireError> {
        let request = GenerateRequest {
            topic: Some(topic.to_string()),
            level: Some(level.to_string()),
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Status(status.as_u16()));
        }
        let body: Value = response.json().await?;
        decode_response(body)
    }
}

/// Acquires roadmaps from a remote generator with a local fallback.
#[derive(Debug, Clone)]
pub struct Acquirer<R> {
    remote: R,
}

impl<R: RemoteGenerator> Acquirer<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Always yields a tree.
    pub async fn acquire(&self, topic: &str, level: &str) -> Acquired {
        match self.remote.generate(topic, level).await {
            Ok(acquired) => {
                debug!(topic, source = ?acquired.source, "remote roadmap accepted");
                acquired
            }
            Err(e) => {
                warn!(topic, error = %e, "remote generate failed, falling back to local generator");
                Acquired {
                    root: generate_local(topic, level, now_millis()),
                    source: Source::Local,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct AlwaysFails;

    #[async_trait]
    impl RemoteGenerator for AlwaysFails {
        async fn generate(&self, _topic: &str, _level: &str) -> Result<Acquired, AcquireError> {
            Err(AcquireError::Status(500))
        }
    }

    struct Canned(Value);

    #[async_trait]
    impl RemoteGenerator for Canned {
        async fn generate(&self, _topic: &str, _level: &str) -> Result<Acquired, AcquireError> {
            decode_response(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fallback_when_remote_errors() {
        let acquirer = Acquirer::new(AlwaysFails);
        let acquired = acquirer.acquire("Web Development", "Beginner").await;

        assert_eq!(acquired.source, Source::Local);
        assert_eq!(acquired.root.label, "Web Development");
        assert!(acquired.root.children.iter().any(|c| c.label == "Frontend"));
    }

    #[tokio::test]
    async fn test_fallback_when_endpoint_unreachable() {
        // Reserve a free port, then close it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let acquirer = Acquirer::new(HttpRemote::new(format!("http://{}/generate", addr)));
        let acquired = acquirer.acquire("Gardening", "Beginner").await;
        assert_eq!(acquired.source, Source::Local);
        assert_eq!(acquired.root.children[0].label, "Soil Basics");
    }

    #[tokio::test]
    async fn test_remote_tree_is_adopted() {
        let acquirer = Acquirer::new(Canned(json!({
            "root": { "id": "r", "label": "Remote", "children": [{ "id": "c", "label": "Child" }] },
            "source": "llm"
        })));
        let acquired = acquirer.acquire("Anything", "Beginner").await;
        assert_eq!(acquired.source, Source::Llm);
        assert_eq!(acquired.root.label, "Remote");
    }

    #[tokio::test]
    async fn test_malformed_remote_tree_falls_back() {
        let acquirer = Acquirer::new(Canned(json!({
            "root": { "id": "r", "children": [] },
            "source": "llm"
        })));
        let acquired = acquirer.acquire("Rust", "Beginner").await;
        assert_eq!(acquired.source, Source::Local);
        assert_eq!(acquired.root.label, "Rust");
    }

    #[test]
    fn test_decode_response_missing_root() {
        assert!(matches!(
            decode_response(json!({ "source": "llm" })),
            Err(AcquireError::MissingRoot)
        ));
        assert!(matches!(decode_response(json!([1, 2])), Err(AcquireError::MissingRoot)));
    }

    #[test]
    fn test_decode_response_reads_source() {
        let acquired = decode_response(json!({
            "root": { "id": "r", "label": "R" },
            "source": "local"
        }))
        .unwrap();
        assert_eq!(acquired.source, Source::Local);
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Llm).unwrap(), "\"llm\"");
    }
}
