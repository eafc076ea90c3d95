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

use serde::Serialize;

use super::score::{CacheInputs, parse_leading_int, parse_max_age};

/// Verdict of the cacheability decision tree.
///
/// The Go and PHP snippets walk the same tree, so the CLI report and the
/// generated programs agree on what they print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cacheability {
    /// `no-store`
    NotCacheable,
    /// `no-cache`
    RequiresRevalidation,
    /// `max-age=N`; `cached_for` is the Age header when it is above zero.
    MaxAge {
        seconds: u64,
        cached_for: Option<u64>,
    },
    /// ETag or Last-Modified without freshness directives.
    Validators,
    Expires,
    NoDirectives,
}

impl Cacheability {
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Cacheability::NotCacheable | Cacheability::NoDirectives)
    }

    /// True when the Age header shows the response came out of a cache.
    pub fn served_from_cache(&self) -> bool {
        matches!(
            self,
            Cacheability::MaxAge {
                cached_for: Some(_),
                ..
            }
        )
    }

    /// One-line explanation, prefixed with a status marker.
    pub fn describe(&self) -> String {
        match self {
            Cacheability::NotCacheable => {
                "❌ This resource is explicitly not cacheable (no-store directive).".into()
            }
            Cacheability::RequiresRevalidation => {
                "⚠️ This resource requires revalidation on each request (no-cache directive)."
                    .into()
            }
            Cacheability::MaxAge {
                seconds,
                cached_for,
            } => {
                let mut line = format!("✅ This resource can be cached for {seconds} seconds.");
                if let Some(age) = cached_for {
                    line.push_str(&format!(
                        "\n🔄 The resource has been in cache for {age} seconds."
                    ));
                }
                line
            }
            Cacheability::Validators => {
                "✅ This resource supports validation via ETag or Last-Modified.".into()
            }
            Cacheability::Expires => "✅ This resource has an Expires header for caching.".into(),
            Cacheability::NoDirectives => "❌ No explicit caching directives found.".into(),
        }
    }
}

/// Walks the no-store / no-cache / max-age / validators / expires tree.
pub fn classify(inputs: &CacheInputs<'_>) -> Cacheability {
    let cache_control = inputs.cache_control.to_ascii_lowercase();

    if cache_control.contains("no-store") {
        return Cacheability::NotCacheable;
    }
    if cache_control.contains("no-cache") {
        return Cacheability::RequiresRevalidation;
    }
    if let Some(seconds) = parse_max_age(&cache_control) {
        let cached_for = parse_leading_int(inputs.age).filter(|age| *age > 0);
        return Cacheability::MaxAge {
            seconds,
            cached_for,
        };
    }
    if !inputs.etag.is_empty() || !inputs.last_modified.is_empty() {
        return Cacheability::Validators;
    }
    if !inputs.expires.is_empty() {
        return Cacheability::Expires;
    }
    Cacheability::NoDirectives
}
