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

use bytes::{Bytes, BytesMut};
use hyper::body::HttpBody;
use hyper::client::connect::HttpInfo;
use hyper::header::{LOCATION, USER_AGENT};
use hyper::{Body, Method, Request, Response};
use std::net::SocketAddr;
use tokio::time::{Duration, Instant, timeout};
use url::Url;

use super::{FetchError, FetchedHeaders, HTTP_CLIENT};
use crate::config::{FetchSettings, RequestMethod};
use crate::headers::{HeaderTable, version_label};

/// A response obtained by talking to the target ourselves.
#[derive(Debug, Clone)]
pub struct TargetResponse {
    /// URL that produced the final, non-redirect response.
    pub final_url: String,
    pub status: u16,
    pub headers: HeaderTable,
    pub version: Option<String>,
    pub remote_addr: Option<SocketAddr>,
    /// Time until the final response headers arrived, redirects included.
    pub elapsed_ms: u64,
    /// Only read when asked for, truncated to the requested limit.
    pub body: Option<Bytes>,
}

/// `direct` strategy: headers of the target, without its body.
pub async fn fetch_headers(url: &str, settings: &FetchSettings) -> Result<FetchedHeaders, FetchError> {
    let resp = fetch_target(url, settings, None).await?;
    Ok(FetchedHeaders {
        status: resp.status,
        headers: resp.headers,
        response_time_ms: resp.elapsed_ms,
        http_version: resp.version,
        ip_address: resp.remote_addr.map(|addr| addr.ip().to_string()),
    })
}

/// Requests `url` with the configured debug headers, following redirects,
/// all within `settings.timeout_secs`. The body is read only when
/// `body_limit` is set, and at most `body_limit` bytes of it are kept.
pub async fn fetch_target(
    url: &str,
    settings: &FetchSettings,
    body_limit: Option<usize>,
) -> Result<TargetResponse, FetchError> {
    let secs = settings.timeout_secs;
    match timeout(
        Duration::from_secs(secs),
        fetch_following_redirects(url, settings, body_limit),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("⏱ Timeout after {}s for '{}'", secs, url);
            Err(FetchError::Timeout(secs))
        }
    }
}

/// Parses `url` and rejects anything that is not plain HTTP(S).
pub fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed =
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(url.to_string(), e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        other => Err(FetchError::InvalidUrl(
            url.to_string(),
            format!("unsupported scheme '{other}' or missing host"),
        )),
    }
}

fn build_request(url: &Url, settings: &FetchSettings) -> Result<Request<Body>, FetchError> {
    let method = match settings.method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Head => Method::HEAD,
    };

    let mut builder = Request::builder()
        .method(method)
        .uri(url.as_str())
        .header(USER_AGENT, settings.user_agent.as_str());

    for header in &settings.debug_headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }

    Ok(builder.body(Body::empty())?)
}

/// Resolves the `Location` of a redirect against the URL that produced it.
fn redirect_target(current: &Url, resp: &Response<Body>) -> Option<Url> {
    if !resp.status().is_redirection() {
        return None;
    }
    let location = resp.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

async fn fetch_following_redirects(
    url: &str,
    settings: &FetchSettings,
    body_limit: Option<usize>,
) -> Result<TargetResponse, FetchError> {
    let start = Instant::now();
    let mut current = parse_target(url)?;

    for hop in 0..=settings.max_redirects {
        let req = build_request(&current, settings)?;
        let resp = HTTP_CLIENT.request(req).await?;

        if let Some(next) = redirect_target(&current, &resp) {
            if hop == settings.max_redirects {
                break;
            }
            tracing::debug!("↪️ {} redirected to {}", current, next);
            current = parse_target(next.as_str())?;
            continue;
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let remote_addr = resp
            .extensions()
            .get::<HttpInfo>()
            .map(|info| info.remote_addr());
        let version = version_label(resp.version());
        let status = resp.status().as_u16();
        let headers = HeaderTable::from(resp.headers());

        let body = match body_limit {
            Some(limit) => Some(read_body_capped(resp.into_body(), limit).await?),
            None => None,
        };

        tracing::debug!(
            "📥 {} answered {} with {} headers in {}ms",
            current,
            status,
            headers.len(),
            elapsed_ms
        );

        return Ok(TargetResponse {
            final_url: current.to_string(),
            status,
            headers,
            version,
            remote_addr,
            elapsed_ms,
            body,
        });
    }

    Err(FetchError::TooManyRedirects(settings.max_redirects))
}

/// Reads at most `limit` bytes of `body`, dropping the rest of the stream.
async fn read_body_capped(mut body: Body, limit: usize) -> Result<Bytes, FetchError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        let room = limit - buf.len();
        if chunk.len() >= room {
            buf.extend_from_slice(&chunk[..room]);
            if chunk.len() > room {
                tracing::debug!("✂️ Body truncated to {} bytes", limit);
            }
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
