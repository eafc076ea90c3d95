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

use super::score::ScoreGrade;

fn is_hit(cache_status: &str) -> bool {
    cache_status.to_ascii_lowercase().contains("hit")
}

/// Builds the plain-English paragraph describing a result.
pub fn generate_summary(score: u8, server: &str, response_time_ms: u64, cache_status: &str) -> String {
    let hit = is_hit(cache_status);

    match ScoreGrade::from_score(score) {
        ScoreGrade::Excellent => {
            let middle = if hit {
                format!(
                    "The page was served from cache, resulting in a fast response time of {response_time_ms}ms."
                )
            } else {
                "The page has proper cache headers, allowing browsers to store content locally."
                    .to_string()
            };
            format!(
                "This website is using {server} and has excellent caching configuration. {middle} \
                 Repeat visitors will experience faster page loads and reduced server load."
            )
        }
        ScoreGrade::Decent => {
            let middle = if hit {
                format!(
                    "The page was served from cache with a response time of {response_time_ms}ms."
                )
            } else {
                "The page has some cache headers but could be optimized further.".to_string()
            };
            format!(
                "This website is using {server} and has decent caching configuration. {middle} \
                 There's room for improvement to enhance user experience for repeat visitors."
            )
        }
        ScoreGrade::Poor => format!(
            "This website is using {server} but has poor or missing caching configuration. \
             The page took {response_time_ms}ms to load and wasn't properly cached. \
             Implementing proper caching would significantly improve performance for repeat \
             visitors and reduce server load."
        ),
    }
}

/// Summary used when no strategy could fetch the headers.
pub fn unreachable_summary(url: &str) -> String {
    format!(
        "Unable to fetch HTTP headers for {url}. This could be due to CORS restrictions or the server not responding."
    )
}
