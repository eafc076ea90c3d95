// Copyright (C) 2025 Matías Salinas (support@fenden.com)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod allorigins;
pub mod direct;
pub mod relay;

use hyper::client::HttpConnector;
use hyper::{Body, Client};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::config::{FetchSettings, FetchStrategy};
use crate::headers::HeaderTable;

pub type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Shared HTTP(S) client for all outbound requests.
///
/// Idle connections are not pooled: every inspection talks to a single host
/// once, and pooled connections would outlive the runtime that opened them.
pub static HTTP_CLIENT: Lazy<HttpsClient> = Lazy::new(|| {
    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Client::builder().pool_max_idle_per_host(0).build(https)
});

/// Why a single strategy failed. Never shown to the user directly: a failed
/// chain degrades to the placeholder result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("could not build request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("request failed: {0}")]
    Transport(#[from] hyper::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("relay answered with status {0}")]
    RelayStatus(u16),

    #[error("could not decode relay payload: {0}")]
    Decode(String),

    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),
}

/// Headers of a target response, however they were obtained.
#[derive(Debug, Clone)]
pub struct FetchedHeaders {
    /// Status code of the target (not of the relay).
    pub status: u16,
    pub headers: HeaderTable,
    pub response_time_ms: u64,
    /// Version negotiated by our own client, when we talked to the target.
    pub http_version: Option<String>,
    /// Peer address, when we talked to the target.
    pub ip_address: Option<String>,
}

/// Runs a single strategy against `url`.
pub async fn fetch_with(
    strategy: &FetchStrategy,
    url: &str,
    settings: &FetchSettings,
) -> Result<FetchedHeaders, FetchError> {
    match strategy {
        FetchStrategy::Direct => direct::fetch_headers(url, settings).await,
        FetchStrategy::Relay { endpoint } => relay::fetch_headers(endpoint, url, settings).await,
        FetchStrategy::AllOrigins { endpoint } => {
            allorigins::fetch_headers(endpoint, url, settings).await
        }
    }
}

/// Builds `{endpoint}?url=<encoded target>`, keeping any query the endpoint already has.
pub fn relay_request_url(endpoint: &str, target: &str) -> Result<String, FetchError> {
    let mut parsed = url::Url::parse(endpoint)
        .map_err(|e| FetchError::InvalidUrl(endpoint.to_string(), e.to_string()))?;
    parsed.query_pairs_mut().append_pair("url", target);
    Ok(parsed.to_string())
}
