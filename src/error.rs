use std::fmt;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::cache::RateLimitError;
use crate::services::VendorApiError;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug)]
pub enum AppError {
    InvalidVendorId(String),
    VendorNotFound(u64),
    RateLimited(RateLimitError),
    Upstream(VendorApiError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidVendorId(raw) => write!(f, "无效的商家ID: {}", raw),
            AppError::VendorNotFound(id) => write!(f, "商家不存在: {}", id),
            AppError::RateLimited(e) => {
                write!(f, "请求过于频繁，请在{}秒后重试", e.retry_after_secs())
            }
            AppError::Upstream(e) => write!(f, "获取商家列表失败: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<RateLimitError> for AppError {
    fn from(e: RateLimitError) -> Self {
        AppError::RateLimited(e)
    }
}

impl From<VendorApiError> for AppError {
    fn from(e: VendorApiError) -> Self {
        AppError::Upstream(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidVendorId(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::VendorNotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR),
        };

        let body = error_to_api_response::<()>(code, self.to_string());
        let mut response = (status, body).into_response();

        if let AppError::RateLimited(e) = &self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(e.retry_after_secs()),
            );
        }

        response
    }
}
