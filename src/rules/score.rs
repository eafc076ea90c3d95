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
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::headers::HeaderTable;

/// Matches the first `max-age=<seconds>` directive. `s-maxage` does not match.
static MAX_AGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)max-age=(\d+)").expect("valid max-age regex"));

pub const MAX_SCORE: u8 = 100;

/// Raw header values feeding the caching score. Absent headers are empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheInputs<'a> {
    pub cache_control: &'a str,
    pub etag: &'a str,
    pub last_modified: &'a str,
    pub expires: &'a str,
    pub cache_status: &'a str,
    pub age: &'a str,
}

impl<'a> CacheInputs<'a> {
    /// Reads the scoring inputs straight from the response headers.
    /// `cache_status` is passed separately since it is derived from several names.
    pub fn from_headers(headers: &'a HeaderTable, cache_status: &'a str) -> Self {
        Self {
            cache_control: headers.get_or_empty("cache-control"),
            etag: headers.get_or_empty("etag"),
            last_modified: headers.get_or_empty("last-modified"),
            expires: headers.get_or_empty("expires"),
            cache_status,
            age: headers.get_or_empty("age"),
        }
    }
}

/// Grade bands used by the summary and the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGrade {
    Excellent,
    Decent,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreGrade::Excellent
        } else if score >= 50 {
            ScoreGrade::Decent
        } else {
            ScoreGrade::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreGrade::Excellent => "excellent",
            ScoreGrade::Decent => "decent",
            ScoreGrade::Poor => "poor",
        }
    }
}

/// Extracts the numeric `max-age` value of a Cache-Control header.
/// Values too large for `u64` saturate to `u64::MAX`.
pub fn parse_max_age(cache_control: &str) -> Option<u64> {
    MAX_AGE
        .captures(cache_control)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
}

/// Parses the leading digits of a header value, ignoring trailing junk.
/// Returns `None` when the value does not start with a digit.
pub fn parse_leading_int(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u64>().ok()
}

/// Parses an HTTP date (`Wed, 21 Oct 2015 07:28:00 GMT`), also accepting RFC 3339.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

/// Points awarded for the magnitude of `max-age`.
fn max_age_bonus(max_age: u64) -> u32 {
    if max_age > 86_400 {
        15
    } else if max_age > 3_600 {
        10
    } else if max_age > 60 {
        5
    } else {
        0
    }
}

/// Calculates the 0-100 caching score of a response.
///
/// | rule | points |
/// |---|---|
/// | Cache-Control present | 10 |
/// | `public` | 5 |
/// | `max-age=` | 10, plus 5/10/15 above one minute/hour/day |
/// | ETag | 10 |
/// | Last-Modified | 10 |
/// | Expires present / in the future | 5 / 5 |
/// | Age present / above zero | 5 / 5 |
/// | cache status contains `hit` | 20 |
///
/// `now` is injected so the result only depends on its inputs.
pub fn calculate_caching_score(inputs: &CacheInputs<'_>, now: DateTime<Utc>) -> u8 {
    let mut score: u32 = 0;

    let cache_control = inputs.cache_control.to_ascii_lowercase();
    if !cache_control.is_empty() {
        score += 10;

        if cache_control.contains("public") {
            score += 5;
        }

        if cache_control.contains("max-age=") {
            score += 10;
            if let Some(max_age) = parse_max_age(&cache_control) {
                score += max_age_bonus(max_age);
            }
        }
    }

    if !inputs.etag.is_empty() {
        score += 10;
    }

    if !inputs.last_modified.is_empty() {
        score += 10;
    }

    if !inputs.expires.is_empty() {
        score += 5;
        if parse_http_date(inputs.expires).is_some_and(|expires| expires > now) {
            score += 5;
        }
    }

    if !inputs.age.is_empty() {
        score += 5;
        if parse_leading_int(inputs.age).is_some_and(|age| age > 0) {
            score += 5;
        }
    }

    if inputs.cache_status.to_ascii_lowercase().contains("hit") {
        score += 20;
    }

    score.min(MAX_SCORE as u32) as u8
}
