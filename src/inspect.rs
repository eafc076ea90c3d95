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

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{FetchSettings, FetchStrategy};
use crate::fetch::{FetchedHeaders, fetch_with};
use crate::headers::{
    HeaderGroups, HeaderTable, group_headers, guess_cdn_provider, guess_edge_location,
    guess_http_version,
};
use crate::rules::cacheability::{Cacheability, classify};
use crate::rules::score::{CacheInputs, ScoreGrade, calculate_caching_score};
use crate::rules::suggestions::{generate_suggestions, unreachable_suggestions};
use crate::rules::summary::{generate_summary, unreachable_summary};
use crate::snippets::{curl, go, php};

/// Names checked, in order, for the CDN cache status.
const CACHE_STATUS_HEADERS: &[&str] = &["x-cache", "cf-cache-status", "x-cache-status", "cache-status"];

/// Everything known about one inspected URL.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderResult {
    pub url: String,
    pub status: u16,
    pub headers: HeaderTable,
    pub server: String,
    pub cache_status: String,
    pub cache_control: String,
    pub age: String,
    pub expires: String,
    pub last_modified: String,
    pub etag: String,
    pub served_by: String,
    pub cache_hits: String,
    pub response_time_ms: u64,
    pub caching_score: u8,
    pub grade: ScoreGrade,
    pub cacheability: Cacheability,
    pub human_readable_summary: String,
    pub performance_suggestions: Vec<String>,
    pub http_version: Option<String>,
    pub ip_address: Option<String>,
    pub edge_location: Option<String>,
    pub cdn_provider: Option<String>,
    #[serde(flatten)]
    pub groups: HeaderGroups,
    /// Strategy that produced the headers, `none` for the placeholder.
    pub fetched_via: String,
}

/// A result together with the snippets for re-running the check elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub result: HeaderResult,
    pub go_code: String,
    pub php_code: String,
    pub curl_command: String,
}

impl Inspection {
    pub fn new(result: HeaderResult) -> Self {
        Self {
            go_code: go::generate_go_code(&result.url),
            php_code: php::generate_php_code(&result.url),
            curl_command: curl::generate_curl_command(&result.url),
            result,
        }
    }
}

/// Trims the input and assumes `https://` when no scheme is given.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Builds the result record from fetched headers.
///
/// Missing headers are shown with display defaults (`age` as `"0"`, `server`
/// as `"Unknown"`), but the score only sees headers the response really sent:
/// a missing Age earns no "age present" points.
pub fn build_result(
    url: &str,
    fetched: FetchedHeaders,
    fetched_via: &str,
    now: DateTime<Utc>,
) -> HeaderResult {
    let headers = fetched.headers;

    let server = headers
        .first_of(&["server"])
        .unwrap_or("Unknown")
        .to_string();
    let cache_status = headers
        .first_of(CACHE_STATUS_HEADERS)
        .unwrap_or("unknown")
        .to_string();

    let inputs = CacheInputs::from_headers(&headers, &cache_status);
    let caching_score = calculate_caching_score(&inputs, now);
    let cacheability = classify(&inputs);
    let response_time_ms = fetched.response_time_ms;

    let human_readable_summary =
        generate_summary(caching_score, &server, response_time_ms, &cache_status);
    let performance_suggestions = generate_suggestions(
        inputs.cache_control,
        inputs.etag,
        inputs.last_modified,
        &server,
        caching_score,
        response_time_ms,
    );

    let http_version = guess_http_version(&headers, fetched.http_version.as_deref());
    let field = |name: &str| headers.get_or_empty(name).to_string();

    HeaderResult {
        url: url.to_string(),
        status: fetched.status,
        server,
        cache_status,
        cache_control: field("cache-control"),
        age: headers.first_of(&["age"]).unwrap_or("0").to_string(),
        expires: field("expires"),
        last_modified: field("last-modified"),
        etag: field("etag"),
        served_by: field("x-served-by"),
        cache_hits: field("x-cache-hits"),
        response_time_ms,
        caching_score,
        grade: ScoreGrade::from_score(caching_score),
        cacheability,
        human_readable_summary,
        performance_suggestions,
        http_version,
        ip_address: fetched.ip_address,
        edge_location: guess_edge_location(&headers),
        cdn_provider: guess_cdn_provider(&headers),
        groups: group_headers(&headers),
        fetched_via: fetched_via.to_string(),
        headers,
    }
}

/// Placeholder returned when every strategy failed.
pub fn fallback_result(url: &str) -> HeaderResult {
    let inputs = CacheInputs::default();
    HeaderResult {
        url: url.to_string(),
        status: 500,
        headers: HeaderTable::new(),
        server: "Unknown".into(),
        cache_status: "unknown".into(),
        cache_control: String::new(),
        age: "0".into(),
        expires: String::new(),
        last_modified: String::new(),
        etag: String::new(),
        served_by: String::new(),
        cache_hits: String::new(),
        response_time_ms: 0,
        caching_score: 0,
        grade: ScoreGrade::Poor,
        cacheability: classify(&inputs),
        human_readable_summary: unreachable_summary(url),
        performance_suggestions: unreachable_suggestions(),
        http_version: None,
        ip_address: None,
        edge_location: None,
        cdn_provider: None,
        groups: HeaderGroups::default(),
        fetched_via: "none".into(),
    }
}

/// Resolves the host of `url` when no strategy reported a peer address.
async fn lookup_ip(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    let mut addrs = tokio::net::lookup_host((host.as_str(), port)).await.ok()?;
    addrs.next().map(|addr| addr.ip().to_string())
}

/// Inspects `input` with the given strategies, first success wins.
pub async fn inspect_with(
    input: &str,
    settings: &FetchSettings,
    strategies: &[FetchStrategy],
) -> Inspection {
    let url = normalize_url(input);
    info!("🔎 Fetching headers for: {}", url);

    for strategy in strategies {
        match fetch_with(strategy, &url, settings).await {
            Ok(mut fetched) => {
                info!(
                    "✅ {} answered {} with {} headers via {}",
                    url,
                    fetched.status,
                    fetched.headers.len(),
                    strategy.name()
                );
                if fetched.ip_address.is_none() {
                    fetched.ip_address = lookup_ip(&url).await;
                }
                let result = build_result(&url, fetched, strategy.name(), Utc::now());
                return Inspection::new(result);
            }
            Err(e) => {
                warn!("⛔ Strategy '{}' failed for '{}': {}", strategy.name(), url, e);
            }
        }
    }

    warn!("🚫 All header fetching strategies failed for '{}', using fallback", url);
    Inspection::new(fallback_result(&url))
}

/// Inspects `input` with the configured strategies.
pub async fn inspect(input: &str, settings: &FetchSettings) -> Inspection {
    inspect_with(input, settings, &settings.strategies).await
}
