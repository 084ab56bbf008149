use std::sync::Arc;

use axum::{Router, routing::get};
use cache::{RateLimiter, VendorCache};
use config::Config;
use middleware::{RateLimitPolicy, log_errors, rate_limit};
use services::VendorApi;

pub mod cache;
pub mod common;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vendors: Arc<VendorCache>,
    pub vendor_api: VendorApi,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, services::VendorApiError> {
        let vendor_api = VendorApi::new(&config)?;
        let rate_limiter = Arc::new(RateLimiter::from_config(&config));

        Ok(Self {
            config,
            vendors: Arc::new(VendorCache::new()),
            vendor_api,
            rate_limiter,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let policy = RateLimitPolicy::new(
        state.rate_limiter.clone(),
        state.config.rate_limit_requests,
    );

    // 商家路由，按客户端地址限流
    let vendor_routes = Router::new()
        .route("/vendors", get(routes::vendor::list_vendors))
        .route("/vendors/{id}", get(routes::vendor::get_vendor))
        .layer(axum::middleware::from_fn_with_state(policy, rate_limit));

    // axum 不允许在根路径 nest
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(vendor_routes)
    } else {
        Router::new().nest(base, vendor_routes)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
