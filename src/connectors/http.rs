//! HTTP connectors for the real platform APIs.
//!
//! Each connector wraps a `reqwest` client with the platform's
//! authentication scheme and decodes the response into the typed profile
//! shape. Non-2xx answers surface as [`TransportError::Status`].

use super::{Connector, TransportError};
use crate::models::{FacebookProfile, InstagramProfile, PlatformProfile, TwitterProfile};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const TWITTER_BASE_URL: &str = "https://api.twitter.com";
pub const FACEBOOK_BASE_URL: &str = "https://graph.facebook.com";
pub const FACEBOOK_API_VERSION: &str = "v17.0";
pub const INSTAGRAM_BASE_URL: &str = "https://graph.instagram.com";

const FACEBOOK_FIELDS: &str = "id,name,followers_count";
const INSTAGRAM_FIELDS: &str = "id,username,followers_count,media_count";

/// HTTP client and parsed base URL shared by all connectors.
#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base_url: Url,
}

impl Endpoint {
    fn new(base_url: &str, timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("followertally/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Sends `request` and decodes the body as `P`.
async fn fetch_json<P>(request: RequestBuilder, handle: &str) -> Result<P, TransportError>
where
    P: PlatformProfile + DeserializeOwned,
{
    debug!("Fetching {} profile for '{}'", P::PLATFORM, handle);

    // The query string can carry the access token; keep it out of errors.
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::Http(e.without_url()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            platform: P::PLATFORM,
            handle: handle.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Http(e.without_url()))?;
    serde_json::from_str(&body).map_err(|e| TransportError::Decode {
        context: format!("{} profile '{}'", P::PLATFORM, handle),
        source: e,
    })
}

/// Twitter API v2 user lookup with bearer-token auth.
#[derive(Debug, Clone)]
pub struct TwitterConnector {
    endpoint: Endpoint,
    bearer_token: String,
}

impl TwitterConnector {
    /// Creates a connector against `base_url`, e.g. [`TWITTER_BASE_URL`].
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, timeout_secs)?,
            bearer_token: bearer_token.to_owned(),
        })
    }
}

#[async_trait]
impl Connector for TwitterConnector {
    type Profile = TwitterProfile;

    async fn fetch_profile(&self, handle: &str) -> Result<TwitterProfile, TransportError> {
        let url = self.endpoint.url(&["2", "users", "by", "username", handle])?;
        let request = self
            .endpoint
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .query(&[("user.fields", "public_metrics")]);
        fetch_json(request, handle).await
    }
}

/// Facebook Graph API node lookup with `access_token` query auth.
#[derive(Debug, Clone)]
pub struct FacebookConnector {
    endpoint: Endpoint,
    access_token: String,
    api_version: String,
}

impl FacebookConnector {
    /// Creates a connector against `base_url`, e.g. [`FACEBOOK_BASE_URL`], and a
    /// Graph API version such as [`FACEBOOK_API_VERSION`].
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
        api_version: &str,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, timeout_secs)?,
            access_token: access_token.to_owned(),
            api_version: api_version.to_owned(),
        })
    }
}

#[async_trait]
impl Connector for FacebookConnector {
    type Profile = FacebookProfile;

    async fn fetch_profile(&self, handle: &str) -> Result<FacebookProfile, TransportError> {
        let url = self.endpoint.url(&[self.api_version.as_str(), handle])?;
        let request = self.endpoint.client.get(url).query(&[
            ("fields", FACEBOOK_FIELDS),
            ("access_token", self.access_token.as_str()),
        ]);
        fetch_json(request, handle).await
    }
}

/// Instagram Graph API user lookup. The handle is the numeric user id.
#[derive(Debug, Clone)]
pub struct InstagramConnector {
    endpoint: Endpoint,
    access_token: String,
}

impl InstagramConnector {
    /// Creates a connector against `base_url`, e.g. [`INSTAGRAM_BASE_URL`].
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: Endpoint::new(base_url, timeout_secs)?,
            access_token: access_token.to_owned(),
        })
    }
}

#[async_trait]
impl Connector for InstagramConnector {
    type Profile = InstagramProfile;

    async fn fetch_profile(&self, handle: &str) -> Result<InstagramProfile, TransportError> {
        let url = self.endpoint.url(&[handle])?;
        let request = self.endpoint.client.get(url).query(&[
            ("fields", INSTAGRAM_FIELDS),
            ("access_token", self.access_token.as_str()),
        ]);
        fetch_json(request, handle).await
    }
}
