use super::OffchainMirror;
use crate::config::MirrorConfig;
use crate::errors::error::AppError;
use crate::log_debug;
use crate::models::PendingMark;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

const UPDATE_OWNED_TRACKS: &str = "mutation UpdateAllOwnedTracks($input: UpdateAllOwnedTracksInput!) { \
updateAllOwnedTracks(input: $input) { tracks { id } } }";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

pub struct GraphqlMirror {
    client: Client,
    endpoint: Url,
    auth_token: Option<String>,
}

impl GraphqlMirror {
    pub fn new(config: &MirrorConfig) -> Result<Self, AppError> {
        let endpoint = Url::parse(&config.graphql_url)
            .map_err(|e| AppError::Config(format!("无效的 GraphQL URL {}: {}", config.graphql_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client 初始化失败: {}", e)))?;
        Ok(Self {
            client,
            endpoint,
            auth_token: config.auth_token.clone(),
        })
    }

    fn variables(mark: &PendingMark) -> Value {
        json!({
            "input": {
                "trackIds": mark.item_ids,
                "trackEditionId": mark.edition_id,
                "owner": format!("{:#x}", mark.owner),
                "nftData": {
                    "pendingRequest": mark.request,
                    "pendingTime": mark.pending_time.to_rfc3339(),
                    "transactionHash": format!("{:#x}", mark.transaction_hash),
                },
            }
        })
    }
}

#[async_trait]
impl OffchainMirror for GraphqlMirror {
    async fn mark_pending(&self, mark: &PendingMark) -> Result<(), AppError> {
        let body = json!({
            "query": UPDATE_OWNED_TRACKS,
            "variables": Self::variables(mark),
        });

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let parsed: GraphqlResponse = response.json().await?;
        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Mirror(joined));
        }

        log_debug!(
            "镜像已标记 {} 个条目为 {:?} (tx {:?})",
            mark.item_ids.len(),
            mark.request,
            mark.transaction_hash
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PendingRequest;
    use chrono::Utc;
    use ethers_core::types::{H160, H256};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mark() -> PendingMark {
        PendingMark {
            item_ids: vec!["track-1".into(), "track-2".into()],
            token_ids: vec![1, 2],
            owner: H160::repeat_byte(0xaa),
            edition_id: Some("edition-9".into()),
            request: PendingRequest::List,
            pending_time: Utc::now(),
            transaction_hash: H256::repeat_byte(0x11),
        }
    }

    fn mirror(server: &MockServer, token: Option<&str>) -> GraphqlMirror {
        GraphqlMirror::new(&MirrorConfig {
            graphql_url: format!("{}/graphql", server.uri()),
            auth_token: token.map(str::to_string),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_mutation_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "updateAllOwnedTracks": { "tracks": [] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        mirror(&server, Some("secret")).mark_pending(&mark()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        let input = &body["variables"]["input"];
        assert_eq!(input["trackIds"], json!(["track-1", "track-2"]));
        assert_eq!(input["nftData"]["pendingRequest"], json!("List"));
        assert_eq!(input["trackEditionId"], json!("edition-9"));
    }

    #[tokio::test]
    async fn graphql_errors_become_mirror_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "not owner" }]
            })))
            .mount(&server)
            .await;

        let err = mirror(&server, None).mark_pending(&mark()).await.unwrap_err();
        assert!(matches!(err, AppError::Mirror(ref m) if m.contains("not owner")));
    }

    #[tokio::test]
    async fn http_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        assert!(matches!(
            mirror(&server, None).mark_pending(&mark()).await,
            Err(AppError::Mirror(_))
        ));
    }
}
