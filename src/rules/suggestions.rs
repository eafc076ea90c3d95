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

/// Maximum number of suggestions handed back to the user.
pub const MAX_SUGGESTIONS: usize = 5;

pub const ADD_CACHE_CONTROL: &str =
    "Add appropriate Cache-Control headers to enable browser and CDN caching.";
pub const SET_MAX_AGE: &str =
    "Set a specific max-age directive in Cache-Control to control caching duration.";
pub const INCREASE_MAX_AGE: &str =
    "Increase max-age value to enable longer caching for static assets.";
pub const ADD_VALIDATORS: &str =
    "Add ETag or Last-Modified headers to enable conditional requests and reduce bandwidth.";
pub const APACHE_TUNING: &str =
    "Consider enabling mod_deflate for compression and mod_expires for better caching control.";
pub const NGINX_TUNING: &str =
    "Ensure gzip compression is enabled in your Nginx configuration for text-based resources.";
pub const CLOUDFLARE_TUNING: &str =
    "Review your Cloudflare caching rules to optimize edge caching for static assets.";
pub const USE_CDN: &str = "Consider implementing a CDN to reduce latency for global users.";
pub const TTL_STRATEGY: &str = "Implement a caching strategy with longer TTLs for static assets and shorter ones for dynamic content.";
pub const USE_HTTP2: &str =
    "Use HTTP/2 or HTTP/3 to improve connection efficiency and reduce latency.";
pub const USE_BROTLI: &str =
    "Consider implementing Brotli compression for better compression ratios than gzip.";
pub const USE_PRELOAD: &str =
    "Implement content preloading with <link rel='preload'> for critical resources.";

/// Suggestions returned when the headers could not be fetched at all.
pub const UNREACHABLE: [&str; 3] = [
    "Unable to analyze headers due to connection error",
    "Check if the URL is correct and accessible",
    "Try using the curl command directly on your terminal",
];

/// Response time above which a CDN is recommended.
const SLOW_RESPONSE_MS: u64 = 300;

/// Picks up to [`MAX_SUGGESTIONS`] suggestions from the catalog, most specific first.
pub fn generate_suggestions(
    cache_control: &str,
    etag: &str,
    last_modified: &str,
    server: &str,
    score: u8,
    response_time_ms: u64,
) -> Vec<String> {
    let mut suggestions: Vec<&str> = Vec::new();
    let cc = cache_control.to_ascii_lowercase();

    if cc.is_empty() || cc.contains("no-store") {
        suggestions.push(ADD_CACHE_CONTROL);
    } else if !cc.contains("max-age=") {
        suggestions.push(SET_MAX_AGE);
    } else if cc.contains("max-age=0") {
        suggestions.push(INCREASE_MAX_AGE);
    }

    if etag.is_empty() && last_modified.is_empty() {
        suggestions.push(ADD_VALIDATORS);
    }

    let server_lc = server.to_ascii_lowercase();
    if server_lc.contains("apache") {
        suggestions.push(APACHE_TUNING);
    } else if server_lc.contains("nginx") {
        suggestions.push(NGINX_TUNING);
    } else if server_lc.contains("cloudflare") {
        suggestions.push(CLOUDFLARE_TUNING);
    }

    if response_time_ms > SLOW_RESPONSE_MS {
        suggestions.push(USE_CDN);
    }

    if score < 50 {
        suggestions.push(TTL_STRATEGY);
    }

    suggestions.extend([USE_HTTP2, USE_BROTLI, USE_PRELOAD]);

    suggestions
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(String::from)
        .collect()
}

pub fn unreachable_suggestions() -> Vec<String> {
    UNREACHABLE.iter().map(|s| s.to_string()).collect()
}
