use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    Config, Credential, LookupError, WeatherRecord, provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Outcome of a single search: a record, or the reason there is none.
pub type LookupResult = std::result::Result<WeatherRecord, LookupError>;

/// Outbound HTTP GET returning the decoded JSON body.
///
/// The body is decoded whatever the HTTP status; providers put their own
/// status code inside the payload. Errors mean the request never completed
/// or the body was not JSON.
#[async_trait]
pub trait HttpFetch: Send + Sync + Debug {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value>;
}

#[async_trait]
impl<T: HttpFetch + ?Sized> HttpFetch for Arc<T> {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        (**self).get_json(url, query).await
    }
}

/// `HttpFetch` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    http: Client,
}

impl ReqwestFetch {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<serde_json::Value> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        debug!(%status, bytes = body.len(), "weather endpoint responded");

        serde_json::from_str(&body).map_err(|e| {
            anyhow!(
                "Response from {url} with status {status} is not JSON ({e}): {}",
                truncate_body(&body)
            )
        })
    }
}

/// Anything that can turn a city name into a [`LookupResult`].
///
/// The controller only talks to this seam, so tests can swap in a scripted
/// service.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn lookup(&self, city: &str, credential: &Credential) -> LookupResult;
}

/// Construct the OpenWeatherMap service described by `config`.
pub fn lookup_from_config(config: &Config) -> Result<OpenWeatherClient<ReqwestFetch>> {
    let fetch = ReqwestFetch::new(config.timeout())?;
    Ok(OpenWeatherClient::with_base_url(fetch, config.base_url()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
