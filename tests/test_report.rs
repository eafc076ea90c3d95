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

#[cfg(test)]
mod tests {
    use cachelens::fetch::FetchedHeaders;
    use cachelens::headers::HeaderTable;
    use cachelens::inspect::{Inspection, build_result, fallback_result};
    use cachelens::report::{render_inspection, render_result, score_bar, status_class};
    use chrono::Utc;

    fn sample_inspection() -> Inspection {
        let headers: HeaderTable = [
            ("server", "nginx"),
            ("cache-control", "max-age=600"),
            ("age", "30"),
            ("x-served-by", "cache-fra19146-FRA"),
            ("fastly-debug-digest", "abc"),
            ("x-frame-options", "DENY"),
        ]
        .into_iter()
        .collect();

        let fetched = FetchedHeaders {
            status: 200,
            headers,
            response_time_ms: 80,
            http_version: Some("HTTP/2".into()),
            ip_address: Some("198.51.100.1".into()),
        };
        Inspection::new(build_result(
            "https://example.com",
            fetched,
            "direct",
            Utc::now(),
        ))
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(200), "success");
        assert_eq!(status_class(301), "redirect");
        assert_eq!(status_class(404), "client error");
        assert_eq!(status_class(503), "server error");
        assert_eq!(status_class(99), "unknown");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0), "[--------------------] 0/100");
        assert_eq!(score_bar(50), "[##########----------] 50/100");
        assert_eq!(score_bar(100), "[####################] 100/100");
    }

    #[test]
    fn test_score_bar_clamps_out_of_range_scores() {
        assert_eq!(score_bar(105), "[####################] 100/100");
        assert_eq!(score_bar(u8::MAX), "[####################] 100/100");
    }

    #[test]
    fn test_render_result_sections() {
        let inspection = sample_inspection();
        let text = render_result(&inspection.result);

        assert!(text.starts_with("https://example.com  [200 success]"));
        assert!(text.contains("Server Type:    nginx"));
        assert!(text.contains("Expires:        Not specified"));
        assert!(text.contains("Caching Analysis"));
        assert!(text.contains("in cache for 30 seconds"));
        assert!(text.contains("Performance Suggestions"));
        assert!(text.contains("Edge Location:  FRA"));
        assert!(text.contains("CDN:            Fastly"));
        assert!(text.contains("Fastly-Debug Headers"));
        assert!(text.contains("  fastly-debug-digest: abc"));
        assert!(text.contains("Security Related Headers"));
        assert!(!text.contains("Pantheon-Debug Headers"));
    }

    #[test]
    fn test_render_inspection_snippets_on_request() {
        let inspection = sample_inspection();

        let short = render_inspection(&inspection, false);
        assert!(short.contains("Try It Yourself"));
        assert!(short.contains(&inspection.curl_command));
        assert!(!short.contains("package main"));

        let long = render_inspection(&inspection, true);
        assert!(long.contains("package main"));
        assert!(long.contains("<?php"));
    }

    #[test]
    fn test_render_fallback() {
        let text = render_result(&fallback_result("https://down.test"));
        assert!(text.starts_with("https://down.test  [500 server error]"));
        assert!(text.contains("Unable to fetch HTTP headers"));
        assert!(text.contains("[--------------------] 0/100 (poor)"));
        assert!(!text.contains("Connection"));
    }
}
