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

// ----------------------
// External dependencies
// ----------------------
use hyper::Server;                              // Hyper: HTTP server for the relay
use std::{net::SocketAddr, process::exit};      // Network + system utilities

use clap::{Parser, Subcommand};                 // CLI argument parsing
use tracing::{error, info};                     // Structured logging macros
use tracing_subscriber::EnvFilter;              // Log filtering via LOG_LEVEL

// ----------------------
// Internal dependencies
// ----------------------
use cachelens::config::{CONFIG, Config};
use cachelens::inspect::inspect_with;
use cachelens::proxy;
use cachelens::report::render_inspection;
use cachelens::snippets::{self, SnippetLanguage};

/// Exit status of `check` when no strategy could fetch the headers.
const EXIT_FETCH_FAILED: i32 = 2;

/// ----------------------------
/// CLI ARGUMENT STRUCTURE
/// ----------------------------
#[derive(Parser, Debug)]
#[command(
    name = "cachelens",
    version,
    about = "Inspect the HTTP caching headers of a website",
    long_about = Some(
        "cachelens fetches the response headers of a URL, scores how cacheable \
        the resource is, explains the result in plain English and prints \
        equivalent Go, PHP and curl snippets. It can also run as a CORS relay."
    )
)]
struct Args {
    /// Path to an optional YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the caching headers of a URL
    Check {
        /// Target URL; `https://` is assumed when no scheme is given
        url: String,

        /// Print the inspection as JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Append the Go and PHP snippets to the text report
        #[arg(long)]
        snippets: bool,

        /// Try a cachelens relay endpoint (e.g. http://localhost:3000/proxy); repeatable
        #[arg(long = "relay", value_name = "ENDPOINT")]
        relays: Vec<String>,

        /// Try an AllOrigins-style endpoint (e.g. https://api.allorigins.win/get); repeatable
        #[arg(long = "allorigins", value_name = "ENDPOINT")]
        allorigins: Vec<String>,

        /// Skip the direct fetch and only use the relays given on the command line
        #[arg(long)]
        no_direct: bool,
    },

    /// Run the CORS relay server
    Serve {
        /// Port to listen on; overrides relay.listen_port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a snippet that re-runs the check outside cachelens
    Snippet {
        #[arg(value_enum)]
        language: SnippetLanguage,
        url: String,
    },
}

/// ----------------------------
/// LOGGING INITIALIZATION
/// ----------------------------
/// Initializes structured logging using the `LOG_LEVEL` environment variable,
/// falling back to `default_level`. Logs go to stderr so stdout only carries
/// the report.
fn init_logging(app_id: &str, default_level: &str) {
    let filter = EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.into()))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!("🚀 Logging initialized for app_id: {app_id}");
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("👋 Shutdown requested");
    }
}

async fn run_relay(config: &Config, port: Option<u16>) {
    proxy::init_metrics();

    let port = port.unwrap_or(config.relay.listen_port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("🚀 Relay listening at http://{}/proxy", addr);

    let server = match Server::try_bind(&addr) {
        Ok(builder) => builder.serve(proxy::router().into_make_service()),
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            exit(1);
        }
    };

    if let Err(e) = server.with_graceful_shutdown(shutdown_signal()).await {
        error!("❌ Relay server error: {}", e);
        exit(1);
    }
}

/// ---------------------------
/// APPLICATION ENTRY POINT
/// ---------------------------
#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("❌ Failed to load config from '{path}': {e}");
                exit(1);
            }
        },
        None => Config::default(),
    };

    let default_level = match args.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    init_logging(&config.app_id, default_level);

    if CONFIG.set(config.clone()).is_err() {
        error!("❌ CONFIG was already initialized");
        exit(1);
    }

    match args.command {
        Command::Check {
            url,
            json,
            snippets,
            relays,
            allorigins,
            no_direct,
        } => {
            let strategies = match config.strategy_chain(relays, allorigins, no_direct) {
                Ok(strategies) => strategies,
                Err(e) => {
                    eprintln!("❌ {e}");
                    exit(1);
                }
            };
            let inspection = inspect_with(&url, &config.fetch, &strategies).await;

            if json {
                match serde_json::to_string_pretty(&inspection) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        error!("❌ Failed to serialize inspection: {e}");
                        exit(1);
                    }
                }
            } else {
                print!("{}", render_inspection(&inspection, snippets));
            }

            if inspection.result.fetched_via == "none" {
                exit(EXIT_FETCH_FAILED);
            }
        }
        Command::Serve { port } => run_relay(&config, port).await,
        Command::Snippet { language, url } => {
            let url = cachelens::inspect::normalize_url(&url);
            println!("{}", snippets::generate(language, &url));
        }
    }
}
