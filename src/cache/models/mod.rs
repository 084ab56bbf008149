/// 缓存数据模型
/// 定义缓存数据的结构体

// 限流计数模型
pub mod rate_limit;

// 商家缓存模型
pub mod vendor;

// 重新导出常用类型
pub use rate_limit::RateLimitEntry;
pub use vendor::{ShopMedia, Vendor, VendorAddress};
