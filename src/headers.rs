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

use hyper::{HeaderMap, Version};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Case-insensitive header table.
///
/// Names are stored lowercased. A repeated name is combined into a single
/// comma-separated value, the way browsers expose headers to scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HeaderTable(BTreeMap<String, String>);

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.trim().to_ascii_lowercase();
        let value = value.trim();
        self.0
            .entry(key)
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Value of `name`, or an empty string when absent.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// First non-empty value among `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|n| self.get(n))
            .find(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for HeaderTable {
    /// Relays may send names in any case; they are folded on the way in.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl From<&HeaderMap> for HeaderTable {
    fn from(map: &HeaderMap) -> Self {
        let mut table = HeaderTable::new();
        for (name, value) in map.iter() {
            table.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
        }
        table
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for HeaderTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = HeaderTable::new();
        for (k, v) in iter {
            table.insert(k.as_ref(), v.as_ref());
        }
        table
    }
}

// ------------------------------------------
// HEADER GROUPS
// ------------------------------------------

/// Headers already shown in the caching details section.
const CACHING_HEADERS: &[&str] = &[
    "server",
    "cache-control",
    "age",
    "expires",
    "last-modified",
    "etag",
    "x-cache",
    "x-cache-hits",
    "x-served-by",
    "cf-cache-status",
    "x-cache-status",
    "cache-status",
];

const SECURITY_HEADERS: &[&str] = &[
    "strict-transport-security",
    "content-security-policy",
    "content-security-policy-report-only",
    "x-frame-options",
    "x-content-type-options",
    "referrer-policy",
    "permissions-policy",
    "x-xss-protection",
    "cross-origin-opener-policy",
    "cross-origin-embedder-policy",
    "cross-origin-resource-policy",
];

pub fn is_fastly_header(name: &str) -> bool {
    name.contains("fastly") || name.contains("surrogate-key")
}

pub fn is_pantheon_header(name: &str) -> bool {
    ["pantheon", "x-var", "x-req", "policy-doc", "pcontext"]
        .iter()
        .any(|marker| name.contains(marker))
}

pub fn is_cloudflare_header(name: &str) -> bool {
    name.contains("cf-")
}

pub fn is_cloudfront_header(name: &str) -> bool {
    name.contains("x-amz-cf") || name.contains("cloudfront")
}

pub fn is_security_header(name: &str) -> bool {
    SECURITY_HEADERS.contains(&name)
}

/// Vendor, security and leftover header groups, each rendered as
/// newline-joined `name: value` lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderGroups {
    pub fastly_debug: String,
    pub pantheon_debug: String,
    pub cloudflare_debug: String,
    pub cloudfront_debug: String,
    pub security_headers: String,
    pub other_headers: String,
}

/// Joins the headers matching `pred` as `name: value` lines.
pub fn collect_matching<F>(headers: &HeaderTable, pred: F) -> String
where
    F: Fn(&str) -> bool,
{
    headers
        .iter()
        .filter(|(name, _)| pred(*name))
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a header table into the display groups.
///
/// Vendor groups may overlap (`cf-` also matches `x-amz-cf-pop`, for example);
/// the "other" group only holds headers that no other group or the caching
/// details already show.
pub fn group_headers(headers: &HeaderTable) -> HeaderGroups {
    let claimed = |name: &str| {
        CACHING_HEADERS.contains(&name)
            || is_fastly_header(name)
            || is_pantheon_header(name)
            || is_cloudflare_header(name)
            || is_cloudfront_header(name)
            || is_security_header(name)
    };

    HeaderGroups {
        fastly_debug: collect_matching(headers, is_fastly_header),
        pantheon_debug: collect_matching(headers, is_pantheon_header),
        cloudflare_debug: collect_matching(headers, is_cloudflare_header),
        cloudfront_debug: collect_matching(headers, is_cloudfront_header),
        security_headers: collect_matching(headers, is_security_header),
        other_headers: collect_matching(headers, |name| !claimed(name)),
    }
}

// ------------------------------------------
// PROTOCOL & EDGE HINTS
// ------------------------------------------

/// Formats a negotiated hyper version.
pub fn version_label(version: Version) -> Option<String> {
    let label = match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => return None,
    };
    Some(label.to_string())
}

/// Best guess of the HTTP version the site can speak.
///
/// An `alt-svc` advertisement of h3 wins over the negotiated version, since
/// the client never negotiates HTTP/3 itself.
pub fn guess_http_version(headers: &HeaderTable, negotiated: Option<&str>) -> Option<String> {
    let alt_svc = headers.get_or_empty("alt-svc").to_ascii_lowercase();

    if alt_svc.contains("h3") {
        return Some("HTTP/3".into());
    }
    if let Some(version) = negotiated {
        if version != "HTTP/1.1" || !alt_svc.contains("h2") {
            return Some(version.to_string());
        }
    }
    if alt_svc.contains("h2") {
        return Some("HTTP/2".into());
    }
    None
}

/// CDN point of presence hinted by the response headers.
pub fn guess_edge_location(headers: &HeaderTable) -> Option<String> {
    if let Some(ray) = headers.get("cf-ray") {
        if let Some((_, colo)) = ray.rsplit_once('-') {
            if !colo.is_empty() {
                return Some(colo.to_ascii_uppercase());
            }
        }
    }

    if let Some(pop) = headers.get("x-amz-cf-pop") {
        if !pop.is_empty() {
            return Some(pop.to_string());
        }
    }

    // x-served-by: "cache-sjc10043-SJC, cache-fra19146-FRA" -> edge nearest the client is last
    headers
        .get("x-served-by")
        .and_then(|v| v.split(',').last())
        .and_then(|node| node.trim().rsplit_once('-'))
        .map(|(_, pop)| pop.trim().to_string())
        .filter(|pop| !pop.is_empty())
}

/// CDN provider hinted by the response headers.
pub fn guess_cdn_provider(headers: &HeaderTable) -> Option<String> {
    let server = headers.get_or_empty("server").to_ascii_lowercase();
    let via = headers.get_or_empty("via").to_ascii_lowercase();
    let names: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
    let any_name = |prefix: &str| names.iter().any(|n| n.starts_with(prefix));

    let provider = if headers.contains("cf-ray") || server.contains("cloudflare") {
        "Cloudflare"
    } else if any_name("x-amz-cf-") || via.contains("cloudfront") {
        "CloudFront"
    } else if any_name("fastly")
        || headers.get_or_empty("x-served-by").starts_with("cache-")
    {
        "Fastly"
    } else if any_name("x-akamai") || server.contains("akamai") {
        "Akamai"
    } else if headers.contains("x-varnish") || via.contains("varnish") {
        "Varnish"
    } else {
        return None;
    };

    Some(provider.to_string())
}
