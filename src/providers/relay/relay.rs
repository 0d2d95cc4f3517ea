use async_trait::async_trait;
use anyhow::Result;
use crate::providers::traits::CompletionProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    reply: Option<String>,
}

/// Forwards messages to a completion endpoint that takes `{"message": ...}`
/// and answers `{"reply": ...}`.
///
/// Non-2xx responses are not errors by themselves: the body is still read,
/// and a body without `reply` yields an empty completion. Only transport
/// and JSON failures are errors.
#[derive(Clone)]
pub struct RelayProvider {
    client: Client,
    endpoint: Url,
}

impl RelayProvider {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl CompletionProvider for RelayProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self.client
            .post(self.endpoint.clone())
            .json(&AskRequest { message: prompt })
            .send()
            .await?;

        let body: AskResponse = response.json().await?;
        Ok(body.reply.unwrap_or_default())
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(format!("relay ({})", self.endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn(router: Router) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{}/ask", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_sends_message_and_reads_reply() {
        let router = Router::new().route(
            "/ask",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "reply": format!("echo: {}", body["message"].as_str().unwrap_or("")) }))
            }),
        );
        let provider = RelayProvider::new(spawn(router).await);

        let reply = provider.complete("what goes with salmon?").await.unwrap();
        assert_eq!(reply, "echo: what goes with salmon?");
    }

    #[tokio::test]
    async fn test_error_body_without_reply_is_empty() {
        let router = Router::new().route(
            "/ask",
            post(|| async {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Something went wrong." })))
            }),
        );
        let provider = RelayProvider::new(spawn(router).await);

        assert_eq!(provider.complete("anything").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_non_json_body_is_an_error() {
        let router = Router::new().route("/ask", post(|| async { "plain text" }));
        let provider = RelayProvider::new(spawn(router).await);

        assert!(provider.complete("anything").await.is_err());
    }
}
