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

use bytes::Bytes;
use hyper::header::USER_AGENT;
use hyper::{Body, Request};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant, timeout};

use super::{FetchError, FetchedHeaders, HTTP_CLIENT, relay_request_url};
use crate::config::FetchSettings;
use crate::headers::HeaderTable;

/// JSON answered by `GET /proxy?url=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayPayload {
    pub url: String,
    pub status: u16,
    pub headers: HeaderTable,
    #[serde(default)]
    pub body: String,
    /// Time the relay waited for the target. Older relays leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

/// GETs a relay endpoint and returns its body, failing on any non-200 answer.
pub async fn get_relay_body(
    endpoint: &str,
    target: &str,
    settings: &FetchSettings,
) -> Result<Bytes, FetchError> {
    let request_url = relay_request_url(endpoint, target)?;
    let req = Request::builder()
        .method("GET")
        .uri(request_url.as_str())
        .header(USER_AGENT, settings.user_agent.as_str())
        .body(Body::empty())?;

    let secs = settings.timeout_secs;
    match timeout(Duration::from_secs(secs), exchange(req)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("⏱ Timeout after {}s for relay '{}'", secs, request_url);
            Err(FetchError::Timeout(secs))
        }
    }
}

async fn exchange(req: Request<Body>) -> Result<Bytes, FetchError> {
    let resp = HTTP_CLIENT.request(req).await?;
    let status = resp.status().as_u16();
    if status != 200 {
        return Err(FetchError::RelayStatus(status));
    }
    Ok(hyper::body::to_bytes(resp.into_body()).await?)
}

/// `relay` strategy: asks a cachelens relay for the target headers.
pub async fn fetch_headers(
    endpoint: &str,
    url: &str,
    settings: &FetchSettings,
) -> Result<FetchedHeaders, FetchError> {
    let start = Instant::now();
    let body = get_relay_body(endpoint, url, settings).await?;
    let round_trip_ms = start.elapsed().as_millis() as u64;

    let payload: RelayPayload =
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(FetchedHeaders {
        status: payload.status,
        headers: payload.headers,
        response_time_ms: payload.response_time_ms.unwrap_or(round_trip_ms),
        http_version: None,
        ip_address: None,
    })
}
