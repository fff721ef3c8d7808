//! HTTP application assembly
//!
//! Mounts the liveness route and the API router, then layers CORS, per-IP
//! rate limiting and security headers on top.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use axum::Router;
use http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
};
use tower::ServiceBuilder;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use crate::{handlers, routes, state::AppState};

/// Rates at or above this disable the limiter (load testing)
pub const RATE_LIMIT_DISABLED_AT: u32 = 100_000;

/// Build the full application router for `state`.
///
/// Fails only when the rate limiter configuration is rejected.
pub fn build_app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let config = &state.config;

    let governor_layer = if config.rate_limit_requests_per_second < RATE_LIMIT_DISABLED_AT {
        // One token is replenished every period; the burst size caps the bucket
        let governor_config = GovernorConfigBuilder::default()
            .period(replenish_period(config.rate_limit_requests_per_second))
            .burst_size(config.rate_limit_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow!("Failed to build rate limiter config"))?;
        Some(GovernorLayer::new(governor_config))
    } else {
        info!("Rate limiting disabled (rate >= {RATE_LIMIT_DISABLED_AT}/s)");
        None
    };

    let cors_layer = cors_layer(config.cors_allowed_origins.as_deref());

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let public_routes = Router::new().route("/", axum::routing::get(handlers::api::health_check));

    Ok(public_routes
        .merge(routes::api::create_api_router())
        .with_state(state)
        .layer(cors_layer)
        .layer(tower::util::option_layer(governor_layer))
        .layer(security_headers))
}

/// Interval between token refills for a sustained rate of `requests_per_second`
fn replenish_period(requests_per_second: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(requests_per_second.max(1)))
}

fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [AUTHORIZATION, CONTENT_TYPE];

    match allowed_origins {
        Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(false),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers(headers)
                .allow_credentials(true)
        }
        None => {
            warn!("CORS not configured, defaulting to same-origin only");
            CorsLayer::new().allow_methods(methods).allow_headers(headers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replenish_period_is_inverse_of_rate() {
        assert_eq!(replenish_period(1), Duration::from_secs(1));
        assert_eq!(replenish_period(60), Duration::from_nanos(16_666_666));
        assert_eq!(replenish_period(1000), Duration::from_millis(1));
        // Zero is rejected by validation; never divide by it here
        assert_eq!(replenish_period(0), Duration::from_secs(1));
    }
}
