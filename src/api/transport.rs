use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{
        ACCEPT,
        USER_AGENT,
    },
    Client,
    Response,
};
use tracing::debug;

use crate::core::{
    FetchError,
    FinderError,
};

pub type QueryPairs = Vec<(&'static str, String)>;

/// A single GET against the provider that yields a JSON document.
///
/// This is the seam between the catalog logic and the network: the reqwest-backed
/// [`HttpTransport`] is used at runtime, tests substitute an in-memory source.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, query: &QueryPairs)
        -> Result<serde_json::Value, FetchError>;
}

pub fn http_client(timeout: Duration) -> Result<Client, FinderError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FinderError> {
        Ok(Self { client: http_client(timeout)? })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &QueryPairs,
    ) -> Result<serde_json::Value, FetchError> {
        debug!(url, ?query, "GET");

        let resp = self
            .client
            .get(url)
            .query(query)
            .header(USER_AGENT, "portal-finder/0.1 (+reqwest)")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport { url: url.to_string(), message: e.to_string() })?;

        let resp = ensure_success(resp)?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport { url: url.to_string(), message: e.to_string() })?;

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::Decode { url: url.to_string(), message: e.to_string() })
    }
}

fn ensure_success(resp: Response) -> Result<Response, FetchError> {
    if !resp.status().is_success() {
        return Err(FetchError::Http { url: resp.url().to_string(), status: resp.status().as_u16() });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{
            method,
            path,
            query_param,
        },
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1 })))
            .mount(&server)
            .await;

        let url = format!("{}/api/character/1", server.uri());
        let value = transport().get_json(&url, &Vec::new()).await.unwrap();
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/location"))
            .and(query_param("page", "99"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "error": "There is nothing here" })),
            )
            .mount(&server)
            .await;

        let url = format!("{}/api/location", server.uri());
        let err = transport().get_json(&url, &vec![("page", "99".to_string())]).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = transport().get_json(&server.uri(), &Vec::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let err = transport().get_json("http://127.0.0.1:9/api", &Vec::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
