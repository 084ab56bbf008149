// 外部服务客户端

pub mod vendor_api;

pub use vendor_api::{VendorApi, VendorApiError};
