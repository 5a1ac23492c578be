use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::auth::AccessToken;
use crate::config::ApiConfig;
use crate::search_console::types::{QueryResponse, SearchAnalyticsQuery};
use crate::search_console::SearchAnalytics;

const USER_AGENT: &str = concat!("gsc-top-pages/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client(config: &ApiConfig) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

pub struct SearchConsoleClient {
    http: Client,
    base_url: String,
    token: AccessToken,
}

impl SearchConsoleClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn query_url(&self, site: &str) -> Result<Url> {
        query_url(&self.base_url, site)
    }
}

pub fn query_url(base_url: &str, site: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("invalid API base url: {base_url}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("API base url cannot hold a path: {base_url}"))?
        .pop_if_empty()
        .push("sites")
        .push(site)
        .push("searchAnalytics")
        .push("query");
    Ok(url)
}

#[async_trait]
impl SearchAnalytics for SearchConsoleClient {
    async fn query(&self, site: &str, request: &SearchAnalyticsQuery) -> Result<QueryResponse> {
        let url = self.query_url(site)?;
        let response = self
            .http
            .post(url.clone())
            .bearer_auth(self.token.secret())
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed POST request: {url}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {url}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("POST {url} returned {status}: {preview}"));
        }
        serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))
    }
}
