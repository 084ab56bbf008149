/// 缓存操作
/// 提供缓存操作的功能实现

// 限流计数操作
pub mod rate_limit;

// 商家列表缓存操作
pub mod vendor;

// 重新导出常用操作
pub use rate_limit::{RateLimitError, RateLimiter};
pub use vendor::VendorCache;
