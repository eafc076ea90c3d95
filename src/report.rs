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

use std::fmt::Write;

use crate::inspect::{HeaderResult, Inspection};

const NOT_SPECIFIED: &str = "Not specified";
const BAR_WIDTH: usize = 20;

/// Human label for the class of a status code.
pub fn status_class(code: u16) -> &'static str {
    match code {
        200..=299 => "success",
        300..=399 => "redirect",
        400..=499 => "client error",
        500..=599 => "server error",
        _ => "unknown",
    }
}

fn or_not_specified(value: &str) -> &str {
    if value.is_empty() { NOT_SPECIFIED } else { value }
}

/// `[##########----------] 50/100`. Scores above 100 are clamped.
pub fn score_bar(score: u8) -> String {
    let score = score.min(100);
    let filled = (score as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {}/100",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        score
    )
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.chars().count()));
}

fn header_group(out: &mut String, title: &str, lines: &str) {
    if lines.is_empty() {
        return;
    }
    section(out, title);
    for line in lines.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

/// Plain-text report of a single result.
pub fn render_result(result: &HeaderResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  [{} {}]",
        result.url,
        result.status,
        status_class(result.status)
    );
    let _ = writeln!(out, "\n{}", result.human_readable_summary);

    section(&mut out, "Overview");
    let _ = writeln!(out, "  Server Type:    {}", or_not_specified(&result.server));
    let _ = writeln!(out, "  Cache Status:   {}", or_not_specified(&result.cache_status));
    let _ = writeln!(out, "  Response Time:  {} ms", result.response_time_ms);
    let _ = writeln!(out, "  Fetched Via:    {}", result.fetched_via);

    section(&mut out, "Caching Details");
    let details = [
        ("Cache-Control", result.cache_control.as_str()),
        ("Age", result.age.as_str()),
        ("Expires", result.expires.as_str()),
        ("Last-Modified", result.last_modified.as_str()),
        ("ETag", result.etag.as_str()),
        ("X-Served-By", result.served_by.as_str()),
        ("X-Cache-Hits", result.cache_hits.as_str()),
    ];
    for (name, value) in details {
        let _ = writeln!(out, "  {:<15} {}", format!("{name}:"), or_not_specified(value));
    }
    let _ = writeln!(
        out,
        "\n  Caching Score:  {} ({})",
        score_bar(result.caching_score),
        result.grade.label()
    );

    section(&mut out, "Caching Analysis");
    for line in result.cacheability.describe().lines() {
        let _ = writeln!(out, "  {line}");
    }

    if !result.performance_suggestions.is_empty() {
        section(&mut out, "Performance Suggestions");
        for suggestion in &result.performance_suggestions {
            let _ = writeln!(out, "  • {suggestion}");
        }
    }

    let hints = [
        ("HTTP Version", result.http_version.as_deref()),
        ("IP Address", result.ip_address.as_deref()),
        ("Edge Location", result.edge_location.as_deref()),
        ("CDN", result.cdn_provider.as_deref()),
    ];
    if hints.iter().any(|(_, v)| v.is_some()) {
        section(&mut out, "Connection");
        for (name, value) in hints {
            if let Some(value) = value {
                let _ = writeln!(out, "  {:<15} {}", format!("{name}:"), value);
            }
        }
    }

    let groups = &result.groups;
    header_group(&mut out, "Security Related Headers", &groups.security_headers);
    header_group(&mut out, "Fastly-Debug Headers", &groups.fastly_debug);
    header_group(&mut out, "Pantheon-Debug Headers", &groups.pantheon_debug);
    header_group(&mut out, "Cloudflare Headers", &groups.cloudflare_debug);
    header_group(&mut out, "CloudFront Headers", &groups.cloudfront_debug);
    header_group(&mut out, "Other Headers", &groups.other_headers);

    out
}

/// Full report; snippets are appended when asked for.
pub fn render_inspection(inspection: &Inspection, with_snippets: bool) -> String {
    let mut out = render_result(&inspection.result);

    section(&mut out, "Try It Yourself");
    let _ = writeln!(out, "  {}", inspection.curl_command);

    if with_snippets {
        section(&mut out, "Go");
        out.push_str(&inspection.go_code);
        section(&mut out, "PHP");
        out.push_str(&inspection.php_code);
    }

    out
}
