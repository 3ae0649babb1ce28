//! HTTP API client for the forum backend.
//!
//! Implements the feed and like ports against the backend's REST
//! surface. Authenticated endpoints take a bearer token read from the
//! session port per request; a missing token fails fast without
//! touching the network.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use gamerhub_domain::{FeedCategory, Post, PostId};

use crate::config::ClientConfig;
use crate::ports::outbound::{ApiError, FeedApiPort, LikeApiPort, SessionPort};

use super::envelope::ApiEnvelope;

/// Client for the forum's REST backend.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionPort>,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionPort>) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Create a client from `GAMERHUB_*` environment variables.
    pub fn from_env(session: Arc<dyn SessionPort>) -> Self {
        Self::new(&ClientConfig::from_env(), session)
    }

    fn feed_url(&self, category: &FeedCategory, page: u32, page_size: usize) -> String {
        let base = &self.base_url;
        match category {
            FeedCategory::Hot => format!("{base}/user/post/hot?limit={page_size}&page={page}"),
            FeedCategory::Latest => format!("{base}/user/post/list?limit={page_size}&page={page}"),
            FeedCategory::Recommend => {
                let offset = (page.saturating_sub(1) as usize) * page_size;
                format!("{base}/user/post/recommendations/hybrid?offset={offset}&page={page}")
            }
            FeedCategory::Mine => format!("{base}/user/post/my?page={page}&size={page_size}"),
            FeedCategory::Section(id) => {
                format!("{base}/user/post/section/{id}?page={page}&size={page_size}")
            }
            FeedCategory::User(id) => {
                format!("{base}/user/post/user/{id}?page={page}&size={page_size}")
            }
            FeedCategory::Search(keyword) => {
                let keyword: String =
                    url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
                format!("{base}/user/post/search?keyword={keyword}&page={page}&size={page_size}")
            }
        }
    }

    /// The `Authorization` header value, normalized to a `Bearer `
    /// prefix. Fails without issuing a request when no session exists.
    fn bearer(&self) -> Result<String, ApiError> {
        let token = self
            .session
            .bearer_token()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Auth("no session token, sign in again".to_string()))?;
        if token.starts_with("Bearer ") {
            Ok(token)
        } else {
            Ok(format!("Bearer {token}"))
        }
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: String,
        auth: bool,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let mut request = self.client.get(&url);
        if auth {
            request = request.header(AUTHORIZATION, self.bearer()?);
        }
        Self::send(request).await
    }

    async fn get_data<T: DeserializeOwned>(&self, url: String, auth: bool) -> Result<T, ApiError> {
        let envelope = self.get_envelope::<T>(url, auth).await?;
        Self::take_data(envelope)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<ApiEnvelope<T>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status == StatusCode::UNAUTHORIZED {
                return Err(ApiError::Auth(message));
            }
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn ensure_success<T>(envelope: &ApiEnvelope<T>) -> Result<(), ApiError> {
        if envelope.is_success() {
            return Ok(());
        }
        // The backend reports expired credentials inside a 2xx
        // envelope rather than via HTTP status.
        if envelope.message.contains("TOKEN_INVALID") {
            return Err(ApiError::Auth(envelope.message.clone()));
        }
        Err(ApiError::Server {
            status: u16::try_from(envelope.code).unwrap_or_default(),
            message: envelope.message.clone(),
        })
    }

    fn take_data<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
        Self::ensure_success(&envelope)?;
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("success envelope without data".to_string()))
    }

    /// Hybrid recommendations, degrading to personalized and then to
    /// the plain hot feed so the tab still renders when the
    /// recommendation engine is down.
    async fn fetch_recommendations(
        &self,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Post>, ApiError> {
        let hybrid = self.feed_url(&FeedCategory::Recommend, page, page_size);
        match self.get_data::<Vec<Post>>(hybrid, true).await {
            Ok(posts) => return Ok(posts),
            Err(err) => {
                warn!(error = %err, "hybrid recommendations failed, trying personalized");
            }
        }

        let personalized = format!(
            "{}/user/post/recommendations?limit={page_size}",
            self.base_url
        );
        match self.get_data::<Vec<Post>>(personalized, true).await {
            Ok(posts) => return Ok(posts),
            Err(err) => {
                warn!(error = %err, "personalized recommendations failed, falling back to hot");
            }
        }

        let hot = format!("{}/user/post/hot?limit={page_size}", self.base_url);
        self.get_data::<Vec<Post>>(hot, false).await
    }
}

#[async_trait]
impl FeedApiPort for HttpApiClient {
    async fn fetch_page(
        &self,
        category: &FeedCategory,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Post>, ApiError> {
        match category {
            FeedCategory::Recommend => self.fetch_recommendations(page, page_size).await,
            _ => {
                let url = self.feed_url(category, page, page_size);
                self.get_data::<Vec<Post>>(url, category.requires_auth())
                    .await
            }
        }
    }
}

#[async_trait]
impl LikeApiPort for HttpApiClient {
    async fn check_like_status(&self, post: PostId) -> Result<bool, ApiError> {
        let url = format!("{}/user/post/like/check/{post}", self.base_url);
        let envelope = self.get_envelope::<bool>(url, true).await?;
        Self::ensure_success(&envelope)?;
        Ok(envelope.data.unwrap_or(false))
    }

    async fn like_post(&self, post: PostId) -> Result<bool, ApiError> {
        let url = format!("{}/user/post/like/{post}", self.base_url);
        let request = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer()?)
            // Empty JSON body, matching the web client
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body("{}");
        let envelope: ApiEnvelope<String> = Self::send(request).await?;
        Ok(envelope.is_success())
    }

    async fn unlike_post(&self, post: PostId) -> Result<bool, ApiError> {
        let url = format!("{}/user/post/like/{post}", self.base_url);
        let request = self.client.delete(&url).header(AUTHORIZATION, self.bearer()?);
        let envelope: ApiEnvelope<String> = Self::send(request).await?;
        Ok(envelope.is_success())
    }
}

#[cfg(test)]
mod tests {
    use gamerhub_domain::{SectionId, UserId};
    use url::Url;

    use crate::ports::outbound::MockSessionPort;

    use super::*;

    fn client_with_token(token: Option<&str>) -> HttpApiClient {
        let token = token.map(str::to_string);
        let mut session = MockSessionPort::new();
        session.expect_bearer_token().returning(move || token.clone());
        let config = ClientConfig::new(Url::parse("http://forum.test:8080").expect("url"));
        HttpApiClient::new(&config, Arc::new(session))
    }

    #[test]
    fn feed_urls_match_the_backend_routes() {
        let client = client_with_token(Some("t"));
        assert_eq!(
            client.feed_url(&FeedCategory::Hot, 2, 8),
            "http://forum.test:8080/user/post/hot?limit=8&page=2"
        );
        assert_eq!(
            client.feed_url(&FeedCategory::Latest, 1, 8),
            "http://forum.test:8080/user/post/list?limit=8&page=1"
        );
        assert_eq!(
            client.feed_url(&FeedCategory::Recommend, 3, 8),
            "http://forum.test:8080/user/post/recommendations/hybrid?offset=16&page=3"
        );
        assert_eq!(
            client.feed_url(&FeedCategory::Mine, 1, 8),
            "http://forum.test:8080/user/post/my?page=1&size=8"
        );
        assert_eq!(
            client.feed_url(&FeedCategory::Section(SectionId::new(4)), 1, 8),
            "http://forum.test:8080/user/post/section/4?page=1&size=8"
        );
        assert_eq!(
            client.feed_url(&FeedCategory::User(UserId::new(9)), 2, 8),
            "http://forum.test:8080/user/post/user/9?page=2&size=8"
        );
    }

    #[test]
    fn search_keywords_are_url_encoded() {
        let client = client_with_token(Some("t"));
        assert_eq!(
            client.feed_url(&FeedCategory::Search("elden ring".to_string()), 1, 8),
            "http://forum.test:8080/user/post/search?keyword=elden+ring&page=1&size=8"
        );
    }

    #[test]
    fn bearer_token_is_normalized() {
        assert_eq!(
            client_with_token(Some("abc123")).bearer(),
            Ok("Bearer abc123".to_string())
        );
        assert_eq!(
            client_with_token(Some("Bearer abc123")).bearer(),
            Ok("Bearer abc123".to_string())
        );
    }

    #[test]
    fn missing_or_blank_token_is_an_auth_error() {
        assert!(matches!(
            client_with_token(None).bearer(),
            Err(ApiError::Auth(_))
        ));
        assert!(matches!(
            client_with_token(Some("   ")).bearer(),
            Err(ApiError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn authenticated_endpoints_short_circuit_without_a_session() {
        let client = client_with_token(None);
        // No request is issued; the session check fails first.
        assert!(matches!(
            client.fetch_page(&FeedCategory::Mine, 1, 8).await,
            Err(ApiError::Auth(_))
        ));
        assert!(matches!(
            client.check_like_status(PostId::new(1)).await,
            Err(ApiError::Auth(_))
        ));
        assert!(matches!(
            client.like_post(PostId::new(1)).await,
            Err(ApiError::Auth(_))
        ));
        assert!(matches!(
            client.unlike_post(PostId::new(1)).await,
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn failure_envelopes_map_to_server_errors() {
        let envelope: ApiEnvelope<Vec<Post>> =
            serde_json::from_str(r#"{"code": 500, "message": "boom"}"#).expect("envelope");
        assert_eq!(
            HttpApiClient::take_data(envelope),
            Err(ApiError::Server {
                status: 500,
                message: "boom".to_string()
            })
        );
    }

    #[test]
    fn token_invalid_envelopes_map_to_auth_errors() {
        let envelope: ApiEnvelope<Vec<Post>> =
            serde_json::from_str(r#"{"code": 403, "message": "TOKEN_INVALID: expired"}"#)
                .expect("envelope");
        assert!(matches!(
            HttpApiClient::ensure_success(&envelope),
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn success_envelope_without_data_is_a_decode_error() {
        let envelope: ApiEnvelope<Vec<Post>> =
            serde_json::from_str(r#"{"code": 200, "message": "ok"}"#).expect("envelope");
        assert!(matches!(
            HttpApiClient::take_data(envelope),
            Err(ApiError::Decode(_))
        ));
    }
}
