//! HTTP access for remote refresh.
//!
//! A store talks to the network through the [`Fetch`] trait so hosts can
//! share their own client (or substitute one entirely). [`HttpFetcher`] is
//! the `reqwest` implementation used by default.

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use super::DownloadError;

/// Status line and parsed body of a JSON GET
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    /// `None` when the response had no body
    pub body: Option<Value>,
}

impl FetchResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }
}

pub trait Fetch: Send + Sync {
    /// Issue a single GET expecting JSON. Transport failures are errors;
    /// HTTP error statuses are returned as responses.
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchResponse, DownloadError>>;
}

/// `reqwest`-backed fetcher.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Share an existing client (and its connection pool)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<FetchResponse, DownloadError>> {
        async move {
            let response = self
                .client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status().as_u16();
            let text = response.text().await?;
            debug!(url = url, status = status, bytes = text.len(), "GET completed");

            if text.trim().is_empty() {
                return Ok(FetchResponse { status, body: None });
            }

            match serde_json::from_str(&text) {
                Ok(body) => Ok(FetchResponse {
                    status,
                    body: Some(body),
                }),
                // Error pages are often HTML; the status code is what matters
                Err(_) if status >= 400 => Ok(FetchResponse { status, body: None }),
                Err(e) => Err(DownloadError::InvalidResponse(format!(
                    "{}: {}",
                    e,
                    DownloadError::truncate_body(&text)
                ))),
            }
        }
        .boxed()
    }
}
