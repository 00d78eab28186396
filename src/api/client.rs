use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    transport::{
        QueryPairs,
        Transport,
    },
    types::{
        Page,
        Resource,
    },
};
use crate::core::{
    query::QueryKey,
    FetchError,
};

pub const DEFAULT_API_BASE: &str = "https://rickandmortyapi.com/api";

/// Typed access to the provider's three collections and to single entities by URL.
///
/// No retries happen here; failures are returned as-is for the caller to record.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, transport }
    }

    pub fn collection_url(&self, key: &QueryKey) -> String {
        format!("{}/{}", self.base, key.kind().path())
    }

    /// Query pairs for a collection request; absent filters are left out entirely.
    pub fn collection_query(key: &QueryKey) -> QueryPairs {
        let mut query: QueryPairs = vec![("page", key.page().to_string())];
        if let Some(name) = key.name() {
            query.push(("name", name.to_string()));
        }
        if let Some(status) = key.status() {
            query.push(("status", status.as_query().to_string()));
        }
        query
    }

    pub async fn fetch_collection<T: Resource>(&self, key: &QueryKey) -> Result<Page<T>, FetchError> {
        if key.page() == 0 {
            return Err(FetchError::InvalidPage(0));
        }
        debug_assert_eq!(key.kind(), T::KIND);

        let url = self.collection_url(key);
        let value = self.transport.get_json(&url, &Self::collection_query(key)).await?;
        let page: Page<T> = decode(&url, value)?;
        debug!(
            kind = ?T::KIND,
            page = key.page(),
            results = page.results.len(),
            total = page.info.count,
            "collection fetched"
        );
        Ok(page)
    }

    pub async fn fetch_by_url<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let value = self.transport.get_json(url, &Vec::new()).await?;
        decode(url, value)
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: serde_json::Value) -> Result<T, FetchError> {
    serde_json::from_value(value)
        .map_err(|e| FetchError::Decode { url: url.to_string(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{
        matchers::{
            method,
            path,
            query_param,
            query_param_is_missing,
        },
        Mock,
        MockServer,
        ResponseTemplate,
    };

    use super::*;
    use crate::{
        api::{
            fake::{
                character_json,
                page_json,
            },
            transport::HttpTransport,
            types::{
                Character,
                CharacterStatus,
                Location,
                ResourceKind,
            },
        },
        core::query::QueryParams,
    };

    fn client(server: &MockServer) -> ApiClient {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        ApiClient::new(format!("{}/api/", server.uri()), Arc::new(transport))
    }

    #[tokio::test]
    async fn test_absent_filters_are_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character"))
            .and(query_param("page", "2"))
            .and(query_param_is_missing("name"))
            .and(query_param_is_missing("status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                "character",
                2,
                3,
                vec![character_json(21)],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let key = QueryParams::default().with_name("   ").with_page(2).key(ResourceKind::Character);
        let page: Page<Character> = client(&server).fetch_collection(&key).await.unwrap();
        assert_eq!(page.results[0].id, 21);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[tokio::test]
    async fn test_filters_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character"))
            .and(query_param("page", "1"))
            .and(query_param("name", "rick"))
            .and(query_param("status", "dead"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                "character",
                1,
                1,
                vec![character_json(8)],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let key = QueryParams::default()
            .with_name(" rick ")
            .with_status(Some(CharacterStatus::Dead))
            .key(ResourceKind::Character);
        let page: Page<Character> = client(&server).fetch_collection(&key).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_missing_page_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/location"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "error": "There is nothing here" })),
            )
            .mount(&server)
            .await;

        let key = QueryParams::default().with_page(40).key(ResourceKind::Location);
        let err = client(&server).fetch_collection::<Location>(&key).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_out_of_range_page_envelope_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/location"))
            .and(query_param("page", "9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_json("location", 9, 7, Vec::new())),
            )
            .mount(&server)
            .await;

        let key = QueryParams::default().with_page(9).key(ResourceKind::Location);
        let page: Page<Location> = client(&server).fetch_collection(&key).await.unwrap();
        assert!(page.is_empty());
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let key = QueryKey::new(ResourceKind::Episode, 0, None, None);
        let err = client(&server).fetch_collection::<crate::api::Episode>(&key).await.unwrap_err();
        assert_eq!(err, FetchError::InvalidPage(0));
    }

    #[tokio::test]
    async fn test_fetch_by_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/character/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(character_json(7)))
            .mount(&server)
            .await;

        let url = format!("{}/api/character/7", server.uri());
        let character: Character = client(&server).fetch_by_url(&url).await.unwrap();
        assert_eq!(character.id, 7);
    }
}
