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

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{self, CONFIG, FetchStrategy};
use crate::fetch::direct::fetch_target;
use crate::fetch::relay::RelayPayload;
use crate::inspect::inspect_with;

// ------------------------------------------
// GLOBAL SHARED STATE
// ------------------------------------------

/// Maximum concurrent outbound fetches performed by the relay
pub static MAX_CONCURRENT_REQUESTS: Lazy<usize> = Lazy::new(|| {
    CONFIG
        .get()
        .map(|c| c.relay.max_concurrent_requests)
        .unwrap_or(50)
});

/// Semaphore to enforce concurrency limits on outgoing requests
pub static SEMAPHORE: Lazy<Arc<Semaphore>> =
    Lazy::new(|| Arc::new(Semaphore::new(*MAX_CONCURRENT_REQUESTS)));

/// Prometheus handle, set once the recorder is installed
static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Deserialize)]
pub struct TargetParams {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

fn error_response(status: StatusCode, error: &str, details: String) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

/// Extracts a non-blank `url` query parameter.
fn target_from(params: TargetParams) -> Option<String> {
    params
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
}

fn busy_response() -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        "Too many concurrent requests",
        format!("limit is {}", *MAX_CONCURRENT_REQUESTS),
    )
}

/// GET /proxy?url=<target>
///
/// Fetches the target with the debug headers and answers
/// `{url, status, headers, body, response_time_ms}`.
pub async fn proxy_handler(Query(params): Query<TargetParams>) -> Response {
    let Some(target) = target_from(params) else {
        return (StatusCode::BAD_REQUEST, "Missing ?url param").into_response();
    };

    let Ok(_permit) = SEMAPHORE.clone().try_acquire_owned() else {
        tracing::warn!("🚦 Relay saturated, rejecting '{}'", target);
        metrics::counter!("cachelens_relay_requests_total", "outcome" => "rejected").increment(1);
        return busy_response();
    };

    let cfg = config::current();
    let body_limit = cfg.relay.include_body.then_some(cfg.relay.max_body_bytes);
    match fetch_target(&target, &cfg.fetch, body_limit).await {
        Ok(resp) => {
            tracing::info!(
                "📡 Relayed '{}' -> {} in {}ms",
                target,
                resp.status,
                resp.elapsed_ms
            );
            metrics::counter!("cachelens_relay_requests_total", "outcome" => "ok").increment(1);

            let body = resp
                .body
                .map(|b| String::from_utf8_lossy(&b).into_owned())
                .unwrap_or_default();

            Json(RelayPayload {
                url: target,
                status: resp.status,
                headers: resp.headers,
                body,
                response_time_ms: Some(resp.elapsed_ms),
            })
            .into_response()
        }
        Err(e) => {
            tracing::warn!("❌ Relay fetch of '{}' failed: {}", target, e);
            metrics::counter!("cachelens_relay_requests_total", "outcome" => "error").increment(1);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch target",
                e.to_string(),
            )
        }
    }
}

/// GET /api/check?url=<target>
///
/// Full inspection done by the relay itself, fetching the target directly.
pub async fn check_handler(Query(params): Query<TargetParams>) -> Response {
    let Some(target) = target_from(params) else {
        return (StatusCode::BAD_REQUEST, "Missing ?url param").into_response();
    };

    let Ok(_permit) = SEMAPHORE.clone().try_acquire_owned() else {
        return busy_response();
    };

    let cfg = config::current();
    let inspection = inspect_with(&target, &cfg.fetch, &[FetchStrategy::Direct]).await;
    metrics::counter!("cachelens_inspections_total", "via" => inspection.result.fetched_via.clone())
        .increment(1);

    Json(inspection).into_response()
}

/// GET /metrics
pub async fn metrics_handler() -> Response {
    match METRICS_HANDLE.get() {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}

/// Installs the global Prometheus recorder. Safe to call more than once.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("⚠️ Prometheus recorder not installed: {}", e);
            PrometheusBuilder::new().build_recorder().handle()
        }
    });
}

/// Relay routes with permissive CORS, so browser pages on any origin can use them.
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/proxy", get(proxy_handler))
        .route("/api/check", get(check_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(cors)
}
