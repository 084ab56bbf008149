// 缓存模块
// 包含进程内缓存的数据结构和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型，方便其他模块使用
pub use models::{RateLimitEntry, ShopMedia, Vendor, VendorAddress};
pub use operations::{RateLimitError, RateLimiter, VendorCache};
