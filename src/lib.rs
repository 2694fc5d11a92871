//! Booking price breakdown engine and pricing API.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::{CacheStats, QuoteCache};
use crate::config::Config;
use crate::pricing::PriceCalculator;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub calculator: PriceCalculator,
    pub quotes: QuoteCache,
}

impl AppState {
    pub fn new(calculator: PriceCalculator, quotes: QuoteCache) -> Self {
        Self { calculator, quotes }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PriceCalculator::new(config.pricing_policy()),
            QuoteCache::new(config.quote_cache_capacity, config.quote_ttl),
        )
    }
}

/// Health check payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rounding_increment: i64,
    pub cache: CacheStats,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rounding_increment: state.calculator.policy().rounding_increment,
        cache: state.quotes.stats(),
    })
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
