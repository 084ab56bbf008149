use std::collections::BTreeMap;
use std::fmt;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::cache::models::vendor::{ShopMedia, Vendor, VendorAddress};
use crate::config::Config;

const STORES_PATH: &str = "/wp-json/dokan/v1/stores";

#[derive(Debug)]
pub enum VendorApiError {
    Request(reqwest::Error),
    Status(StatusCode),
}

impl fmt::Display for VendorApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorApiError::Request(e) => write!(f, "vendor api request failed: {}", e),
            VendorApiError::Status(status) => write!(f, "vendor api returned {}", status),
        }
    }
}

impl std::error::Error for VendorApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VendorApiError::Request(e) => Some(e),
            VendorApiError::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for VendorApiError {
    fn from(e: reqwest::Error) -> Self {
        VendorApiError::Request(e)
    }
}

/// 远端店铺列表接口客户端
#[derive(Clone)]
pub struct VendorApi {
    client: Client,
    base_url: String,
    page_size: u32,
    credentials: Option<(String, String)>,
}

// 远端返回的店铺结构，未设置的地址和社交链接可能是空数组
#[derive(Debug, Deserialize)]
struct RemoteStore {
    id: u64,
    #[serde(default)]
    store_name: String,
    #[serde(default, alias = "shop_description", alias = "vendor_biography")]
    description: Option<String>,
    #[serde(default)]
    social: Value,
    #[serde(default)]
    banner: Value,
    #[serde(default)]
    gravatar: Value,
    #[serde(default)]
    address: Value,
}

impl From<RemoteStore> for Vendor {
    fn from(store: RemoteStore) -> Self {
        let social = match store.social {
            Value::Object(links) => links
                .into_iter()
                .filter_map(|(name, url)| non_empty_string(url).map(|url| (name, url)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            id: store.id,
            name: store.store_name,
            description: store.description.unwrap_or_default(),
            social,
            media: ShopMedia {
                banner: non_empty_string(store.banner),
                avatar: non_empty_string(store.gravatar),
            },
            address: serde_json::from_value::<VendorAddress>(store.address).unwrap_or_default(),
        }
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

impl VendorApi {
    pub fn new(config: &Config) -> Result<Self, VendorApiError> {
        let client = Client::builder()
            .timeout(config.vendor_api_timeout())
            .build()?;

        let credentials = match (&config.wc_consumer_key, &config.wc_consumer_secret) {
            (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.vendor_api_url.trim_end_matches('/').to_string(),
            page_size: config.vendor_page_size,
            credentials,
        })
    }

    /// 拉取完整的店铺列表，保持远端顺序
    pub async fn fetch_vendors(&self) -> Result<Vec<Vendor>, VendorApiError> {
        let url = format!("{}{}", self.base_url, STORES_PATH);
        tracing::debug!("Fetching vendors from {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", self.page_size)]);
        if let Some((key, secret)) = &self.credentials {
            request = request.basic_auth(key, Some(secret));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Vendor api responded with {}", status);
            return Err(VendorApiError::Status(status));
        }

        let stores: Vec<RemoteStore> = response.json().await?;
        Ok(stores.into_iter().map(Vendor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_remote_store_with_empty_sections() {
        let store: RemoteStore = serde_json::from_value(serde_json::json!({
            "id": 12,
            "store_name": "Domaine des Collines",
            "shop_description": "Natural wines from the Loire",
            "social": [],
            "banner": "",
            "gravatar": "https://cdn.test/avatar.png",
            "address": []
        }))
        .unwrap();

        let vendor = Vendor::from(store);
        assert_eq!(vendor.id, 12);
        assert_eq!(vendor.description, "Natural wines from the Loire");
        assert!(vendor.social.is_empty());
        assert_eq!(vendor.media.banner, None);
        assert_eq!(vendor.media.avatar.as_deref(), Some("https://cdn.test/avatar.png"));
        assert_eq!(vendor.address, VendorAddress::default());
    }

    #[test]
    fn keeps_only_filled_social_links() {
        let store: RemoteStore = serde_json::from_value(serde_json::json!({
            "id": 3,
            "store_name": "Bodega Norte",
            "social": { "fb": "https://fb.test/norte", "twitter": "", "instagram": null },
            "address": { "street_1": "Calle 1", "city": "Haro", "zip": "26200", "country": "ES" }
        }))
        .unwrap();

        let vendor = Vendor::from(store);
        assert_eq!(vendor.social.len(), 1);
        assert_eq!(vendor.social["fb"], "https://fb.test/norte");
        assert_eq!(vendor.address.city, "Haro");
        assert_eq!(vendor.address.street_2, "");
        assert_eq!(vendor.description, "");
    }
}
