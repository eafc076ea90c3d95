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

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{error::Error, fs};

/// Ways of obtaining the response headers of a target URL.
/// Deserialized from a `type`-tagged YAML map, e.g. `{ type: relay, endpoint: ... }`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Request the target directly from this process.
    Direct,
    /// A cachelens-compatible relay answering `{url, status, headers, body}`.
    Relay { endpoint: String },
    /// An AllOrigins-style relay answering `{status: {http_code, headers}}`.
    AllOrigins { endpoint: String },
}

impl FetchStrategy {
    /// Short name used in logs and in the `fetched_via` field of a result.
    pub fn name(&self) -> &'static str {
        match self {
            FetchStrategy::Direct => "direct",
            FetchStrategy::Relay { .. } => "relay",
            FetchStrategy::AllOrigins { .. } => "allorigins",
        }
    }
}

/// HTTP method used for direct fetches.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Head,
}

/// A header sent along with every outbound request to the target.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DebugHeader {
    pub name: String,
    pub value: String,
}

/// Outbound request settings shared by the CLI and the relay server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Timeout for a single outbound request in seconds.
    pub timeout_secs: u64,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    pub method: RequestMethod,
    pub user_agent: String,
    /// Headers asking CDNs to expose their debug headers.
    pub debug_headers: Vec<DebugHeader>,
    /// Strategies attempted in order; the first success wins.
    pub strategies: Vec<FetchStrategy>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_redirects: 5,
            method: RequestMethod::Get,
            user_agent: concat!("cachelens/", env!("CARGO_PKG_VERSION")).to_string(),
            debug_headers: vec![
                DebugHeader {
                    name: "Fastly-Debug".into(),
                    value: "1".into(),
                },
                DebugHeader {
                    name: "Pantheon-Debug".into(),
                    value: "1".into(),
                },
            ],
            strategies: vec![FetchStrategy::Direct],
        }
    }
}

/// Settings for the `serve` subcommand.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub listen_port: u16,
    /// Max number of concurrent outbound fetches performed by the relay.
    pub max_concurrent_requests: usize,
    /// Whether `/proxy` includes the target body in its JSON answer.
    pub include_body: bool,
    /// Bytes of the target body kept in a `/proxy` answer.
    pub max_body_bytes: usize,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            listen_port: 3000,
            max_concurrent_requests: 50,
            include_body: true,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Main configuration structure loaded from a YAML file.
/// Every field has a default so the CLI works without any file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application identifier, used in logs.
    pub app_id: String,
    pub fetch: FetchSettings,
    pub relay: RelaySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: "cachelens".into(),
            fetch: FetchSettings::default(),
            relay: RelaySettings::default(),
        }
    }
}

/// Global, lazily-initialized config object shared across the application.
pub static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    /// Parses configuration from a YAML file.
    ///
    /// # Returns
    /// - `Ok(Config)` if parsing and validation succeed.
    /// - `Err(Box<dyn Error>)` if the file is missing, malformed, or invalid.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parses and validates configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn Error>> {
        let parsed: Config = serde_yaml::from_str(contents)?;
        parsed.validate()?;

        for strategy in &parsed.fetch.strategies {
            match strategy {
                FetchStrategy::Direct => tracing::info!("Fetch strategy: direct"),
                FetchStrategy::Relay { endpoint } | FetchStrategy::AllOrigins { endpoint } => {
                    tracing::info!("Fetch strategy: {} via '{}'", strategy.name(), endpoint)
                }
            }
        }

        Ok(parsed)
    }

    /// Rejects settings that would make every inspection fail.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.fetch.strategies.is_empty() {
            return Err("fetch.strategies must list at least one strategy.".into());
        }
        validate_endpoints(&self.fetch.strategies)?;

        if self.fetch.timeout_secs == 0 {
            return Err("fetch.timeout_secs must be greater than zero.".into());
        }

        if self.relay.max_concurrent_requests == 0 {
            return Err("relay.max_concurrent_requests must be greater than zero.".into());
        }

        Ok(())
    }

    /// Strategy chain for one `check` run.
    ///
    /// Endpoints given on the command line replace the configured chain:
    /// direct first (unless `no_direct`), then the relays, then the
    /// AllOrigins endpoints. Without any of them the configured chain is used.
    pub fn strategy_chain(
        &self,
        relays: Vec<String>,
        allorigins: Vec<String>,
        no_direct: bool,
    ) -> Result<Vec<FetchStrategy>, Box<dyn Error>> {
        if relays.is_empty() && allorigins.is_empty() {
            if no_direct {
                return Err("--no-direct needs at least one --relay or --allorigins endpoint.".into());
            }
            return Ok(self.fetch.strategies.clone());
        }

        let mut strategies = Vec::new();
        if !no_direct {
            strategies.push(FetchStrategy::Direct);
        }
        strategies.extend(relays.into_iter().map(|endpoint| FetchStrategy::Relay { endpoint }));
        strategies.extend(
            allorigins
                .into_iter()
                .map(|endpoint| FetchStrategy::AllOrigins { endpoint }),
        );

        validate_endpoints(&strategies)?;
        Ok(strategies)
    }
}

fn validate_endpoints(strategies: &[FetchStrategy]) -> Result<(), Box<dyn Error>> {
    for strategy in strategies {
        match strategy {
            FetchStrategy::Relay { endpoint } | FetchStrategy::AllOrigins { endpoint }
                if endpoint.trim().is_empty() =>
            {
                return Err(
                    format!("{} strategy selected but endpoint is empty.", strategy.name()).into(),
                );
            }
            _ => {}
        }
    }
    Ok(())
}

/// Returns the global config, or the defaults when none was installed.
pub fn current() -> Config {
    CONFIG.get().cloned().unwrap_or_default()
}
