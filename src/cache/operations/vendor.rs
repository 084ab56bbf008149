use std::future::Future;

use tokio::sync::OnceCell;

use crate::cache::models::vendor::Vendor;

/// 商家列表缓存
///
/// 首次访问时通过调用方提供的函数拉取完整列表，之后整个进程生命周期内都从内存读取，
/// 不做过期或刷新。并发的首次调用只会触发一次拉取，其余调用等待同一个结果。
#[derive(Debug, Default)]
pub struct VendorCache {
    vendors: OnceCell<Vec<Vendor>>,
}

impl VendorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回缓存的商家列表，缓存为空时调用 `fetch` 填充
    ///
    /// `fetch` 失败时缓存保持为空，错误原样返回，下一次调用会重新拉取
    pub async fn get_vendors<F, Fut, E>(&self, fetch: F) -> Result<&[Vendor], E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Vendor>, E>>,
    {
        let vendors = self
            .vendors
            .get_or_try_init(|| async {
                tracing::info!("Vendor cache empty, fetching vendor list");
                let vendors = fetch().await?;
                tracing::info!("Cached {} vendors", vendors.len());
                Ok::<_, E>(vendors)
            })
            .await?;

        Ok(vendors.as_slice())
    }

    /// 按ID查找，不会触发拉取
    pub fn get_vendor_by_id(&self, id: u64) -> Option<&Vendor> {
        self.vendors.get()?.iter().find(|vendor| vendor.id == id)
    }

    pub fn is_populated(&self) -> bool {
        self.vendors.initialized()
    }
}
