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
pub mod tests {
    use cachelens::config::{Config, FetchStrategy, RequestMethod, current};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config_from_file() {
        let yaml = r#"
app_id: testapp
fetch:
  timeout_secs: 3
  max_redirects: 2
  method: HEAD
  user_agent: test-agent
  debug_headers:
    - name: X-Debug
      value: "on"
  strategies:
    - type: direct
    - type: relay
      endpoint: http://localhost:3000/proxy
    - type: allorigins
      endpoint: https://api.allorigins.win/get
relay:
  listen_port: 8080
  max_concurrent_requests: 4
  include_body: false
  max_body_bytes: 2048
"#;

        let file = write_config(yaml);
        let config = Config::from_file(file.path().to_str().unwrap())
            .expect("should parse valid config");

        assert_eq!(config.app_id, "testapp");
        assert_eq!(config.fetch.timeout_secs, 3);
        assert_eq!(config.fetch.max_redirects, 2);
        assert_eq!(config.fetch.method, RequestMethod::Head);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert_eq!(config.fetch.debug_headers.len(), 1);
        assert_eq!(config.fetch.debug_headers[0].name, "X-Debug");
        assert_eq!(
            config.fetch.strategies,
            vec![
                FetchStrategy::Direct,
                FetchStrategy::Relay {
                    endpoint: "http://localhost:3000/proxy".into()
                },
                FetchStrategy::AllOrigins {
                    endpoint: "https://api.allorigins.win/get".into()
                },
            ]
        );
        assert_eq!(config.relay.listen_port, 8080);
        assert_eq!(config.relay.max_concurrent_requests, 4);
        assert!(!config.relay.include_body);
        assert_eq!(config.relay.max_body_bytes, 2048);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("app_id: partial\n").expect("should parse");

        assert_eq!(config.app_id, "partial");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.fetch.method, RequestMethod::Get);
        assert!(config.fetch.user_agent.starts_with("cachelens/"));
        let names: Vec<&str> = config
            .fetch
            .debug_headers
            .iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fastly-Debug", "Pantheon-Debug"]);
        assert_eq!(config.fetch.strategies, vec![FetchStrategy::Direct]);
        assert_eq!(config.relay.listen_port, 3000);
        assert_eq!(config.relay.max_concurrent_requests, 50);
        assert!(config.relay.include_body);
        assert_eq!(config.relay.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_empty_strategy_list_is_rejected() {
        let yaml = r#"
fetch:
  strategies: []
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one strategy"));
    }

    #[test]
    fn test_relay_without_endpoint_is_rejected() {
        let yaml = r#"
fetch:
  strategies:
    - type: relay
      endpoint: "  "
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("relay strategy selected but endpoint is empty"));
    }

    #[test]
    fn test_allorigins_without_endpoint_is_rejected() {
        let yaml = r#"
fetch:
  strategies:
    - type: allorigins
      endpoint: ""
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("allorigins strategy selected"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Config::from_yaml("fetch:\n  timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let err = Config::from_yaml("relay:\n  max_concurrent_requests: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_concurrent_requests"));
    }

    #[test]
    fn test_unknown_strategy_type_fails() {
        let yaml = r#"
fetch:
  strategies:
    - type: carrier-pigeon
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml_fails() {
        let file = write_config("fetch: [this is not: valid");
        assert!(Config::from_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(Config::from_file("/definitely/not/here/cachelens.yaml").is_err());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(FetchStrategy::Direct.name(), "direct");
        assert_eq!(
            FetchStrategy::Relay {
                endpoint: "x".into()
            }
            .name(),
            "relay"
        );
        assert_eq!(
            FetchStrategy::AllOrigins {
                endpoint: "x".into()
            }
            .name(),
            "allorigins"
        );
    }

    #[test]
    fn test_current_falls_back_to_defaults() {
        // CONFIG is never set in this test binary.
        let config = current();
        assert_eq!(config.app_id, "cachelens");
        assert_eq!(config.fetch.strategies, vec![FetchStrategy::Direct]);
    }
}
