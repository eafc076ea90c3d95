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

use serde::Deserialize;
use tokio::time::Instant;

use super::relay::get_relay_body;
use super::{FetchError, FetchedHeaders};
use crate::config::FetchSettings;
use crate::headers::HeaderTable;

#[derive(Debug, Deserialize)]
pub struct AllOriginsStatus {
    pub http_code: Option<u16>,
    #[serde(default)]
    pub headers: Option<HeaderTable>,
    /// Milliseconds, when the service reports it.
    pub response_time: Option<u64>,
}

/// JSON answered by an AllOrigins-style `/get?url=...` endpoint.
#[derive(Debug, Deserialize)]
pub struct AllOriginsPayload {
    pub status: Option<AllOriginsStatus>,
}

/// Turns an AllOrigins payload into fetched headers.
/// A payload without `status` carries nothing useful and is a failure.
pub fn decode_payload(body: &[u8], round_trip_ms: u64) -> Result<FetchedHeaders, FetchError> {
    let payload: AllOriginsPayload =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let status = payload
        .status
        .ok_or_else(|| FetchError::Decode("payload has no status".into()))?;

    Ok(FetchedHeaders {
        status: status.http_code.unwrap_or(200),
        headers: status.headers.unwrap_or_default(),
        response_time_ms: status.response_time.unwrap_or(round_trip_ms),
        http_version: None,
        ip_address: None,
    })
}

/// `allorigins` strategy.
pub async fn fetch_headers(
    endpoint: &str,
    url: &str,
    settings: &FetchSettings,
) -> Result<FetchedHeaders, FetchError> {
    let start = Instant::now();
    let body = get_relay_body(endpoint, url, settings).await?;
    decode_payload(&body, start.elapsed().as_millis() as u64)
}
