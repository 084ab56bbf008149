use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::cache::{RateLimiter, keys::UNKNOWN_CLIENT};
use crate::error::AppError;

/// 限流器加上该路由组的请求上限
#[derive(Clone)]
pub struct RateLimitPolicy {
    limiter: Arc<RateLimiter>,
    limit: u32,
}

impl RateLimitPolicy {
    pub fn new(limiter: Arc<RateLimiter>, limit: u32) -> Self {
        Self { limiter, limit }
    }
}

/// 依次从 X-Real-IP、X-Forwarded-For、连接地址中取客户端IP，都没有时使用固定键
pub fn client_address(headers: &HeaderMap, remote: Option<SocketAddr>) -> String {
    let remote_ip = remote.map(|addr| addr.ip().to_string());

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|ip| !ip.trim().is_empty())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref()) // 降级使用连接IP
        .unwrap_or(UNKNOWN_CLIENT)
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(policy): State<RateLimitPolicy>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let ip = client_address(req.headers(), remote);

    match policy.limiter.check(&ip, policy.limit) {
        Ok(count) => {
            tracing::debug!("ip: {} request {}/{}", ip, count, policy.limit);
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!("Rejecting {} {} from {}: {}", req.method(), req.uri(), ip, e);
            AppError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn remote() -> Option<SocketAddr> {
        Some("192.168.1.20:51000".parse().unwrap())
    }

    #[test]
    fn prefers_real_ip_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.7"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_address(&headers, remote()), "203.0.113.7");
    }

    #[test]
    fn uses_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" , 198.51.100.1, 10.0.0.1"),
        );
        assert_eq!(client_address(&headers, remote()), "198.51.100.1");
    }

    #[test]
    fn falls_back_to_peer_then_fixed_key() {
        let headers = HeaderMap::new();
        assert_eq!(client_address(&headers, remote()), "192.168.1.20");
        assert_eq!(client_address(&headers, None), UNKNOWN_CLIENT);
    }
}
