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
    use cachelens::headers::{
        HeaderTable, group_headers, guess_cdn_provider, guess_edge_location, guess_http_version,
        version_label,
    };
    use hyper::header::{HeaderMap, HeaderValue};
    use hyper::Version;

    fn table(pairs: &[(&str, &str)]) -> HeaderTable {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let headers = table(&[("Cache-Control", "max-age=60"), ("ETag", "\"v1\"")]);
        assert_eq!(headers.get("cache-control"), Some("max-age=60"));
        assert_eq!(headers.get("CACHE-CONTROL"), Some("max-age=60"));
        assert_eq!(headers.get("etag"), Some("\"v1\""));
        assert!(headers.contains("ETAG"));
        assert_eq!(headers.get_or_empty("expires"), "");
    }

    #[test]
    fn test_repeated_names_are_joined() {
        let headers = table(&[("Vary", "Accept"), ("vary", "Origin")]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("vary"), Some("Accept, Origin"));
    }

    #[test]
    fn test_first_of_skips_empty_values() {
        let headers = table(&[("x-cache", ""), ("cf-cache-status", "HIT")]);
        assert_eq!(headers.first_of(&["x-cache", "cf-cache-status"]), Some("HIT"));
        assert_eq!(headers.first_of(&["x-cache"]), None);
    }

    #[test]
    fn test_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert("server", HeaderValue::from_static("nginx"));
        map.append("set-cookie", HeaderValue::from_static("a=1"));
        map.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = HeaderTable::from(&map);
        assert_eq!(headers.get("Server"), Some("nginx"));
        assert_eq!(headers.get("set-cookie"), Some("a=1, b=2"));
    }

    #[test]
    fn test_deserialize_folds_case() {
        let headers: HeaderTable =
            serde_json::from_str(r#"{"Cache-Control":"no-cache","X-Cache":"MISS"}"#).unwrap();
        assert_eq!(headers.get("cache-control"), Some("no-cache"));
        let names: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["cache-control", "x-cache"]);
    }

    #[test]
    fn test_group_headers() {
        let headers = table(&[
            ("cache-control", "max-age=60"),
            ("fastly-debug-digest", "abc"),
            ("surrogate-key", "home"),
            ("x-pantheon-styx-hostname", "styx"),
            ("cf-ray", "8a1b2c3d4e5f-AMS"),
            ("x-amz-cf-id", "xyz"),
            ("strict-transport-security", "max-age=31536000"),
            ("content-type", "text/html"),
        ]);
        let groups = group_headers(&headers);

        assert_eq!(
            groups.fastly_debug,
            "fastly-debug-digest: abc\nsurrogate-key: home"
        );
        assert_eq!(groups.pantheon_debug, "x-pantheon-styx-hostname: styx");
        assert!(groups.cloudflare_debug.contains("cf-ray: 8a1b2c3d4e5f-AMS"));
        assert_eq!(groups.cloudfront_debug, "x-amz-cf-id: xyz");
        assert_eq!(
            groups.security_headers,
            "strict-transport-security: max-age=31536000"
        );
        assert_eq!(groups.other_headers, "content-type: text/html");
    }

    #[test]
    fn test_group_headers_empty() {
        let groups = group_headers(&HeaderTable::new());
        assert!(groups.fastly_debug.is_empty());
        assert!(groups.other_headers.is_empty());
    }

    #[test]
    fn test_http_version_hints() {
        let h3 = table(&[("alt-svc", "h3=\":443\"; ma=86400")]);
        assert_eq!(guess_http_version(&h3, Some("HTTP/1.1")).as_deref(), Some("HTTP/3"));

        let h2 = table(&[("alt-svc", "h2=\":443\"")]);
        assert_eq!(guess_http_version(&h2, Some("HTTP/1.1")).as_deref(), Some("HTTP/2"));
        assert_eq!(guess_http_version(&h2, None).as_deref(), Some("HTTP/2"));

        let none = HeaderTable::new();
        assert_eq!(guess_http_version(&none, Some("HTTP/2")).as_deref(), Some("HTTP/2"));
        assert_eq!(guess_http_version(&none, None), None);

        assert_eq!(version_label(Version::HTTP_11).as_deref(), Some("HTTP/1.1"));
        assert_eq!(version_label(Version::HTTP_2).as_deref(), Some("HTTP/2"));
    }

    #[test]
    fn test_edge_location() {
        let cloudflare = table(&[("cf-ray", "8a1b2c3d4e5f-ams")]);
        assert_eq!(guess_edge_location(&cloudflare).as_deref(), Some("AMS"));

        let cloudfront = table(&[("x-amz-cf-pop", "FRA56-C1")]);
        assert_eq!(guess_edge_location(&cloudfront).as_deref(), Some("FRA56-C1"));

        let fastly = table(&[("x-served-by", "cache-sjc10043-SJC, cache-fra19146-FRA")]);
        assert_eq!(guess_edge_location(&fastly).as_deref(), Some("FRA"));

        assert_eq!(guess_edge_location(&HeaderTable::new()), None);
    }

    #[test]
    fn test_cdn_provider() {
        let cases = [
            (vec![("cf-ray", "abc-AMS")], Some("Cloudflare")),
            (vec![("server", "cloudflare")], Some("Cloudflare")),
            (vec![("x-amz-cf-id", "x")], Some("CloudFront")),
            (vec![("via", "1.1 abc.cloudfront.net (CloudFront)")], Some("CloudFront")),
            (vec![("x-served-by", "cache-fra19146-FRA")], Some("Fastly")),
            (vec![("server", "AkamaiGHost")], Some("Akamai")),
            (vec![("x-varnish", "123 456")], Some("Varnish")),
            (vec![("server", "nginx")], None),
        ];

        for (pairs, expected) in cases {
            let headers = table(&pairs);
            assert_eq!(
                guess_cdn_provider(&headers).as_deref(),
                expected,
                "headers {pairs:?}"
            );
        }
    }
}
