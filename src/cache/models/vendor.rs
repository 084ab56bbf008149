use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 商家（酒庄/店铺）缓存数据模型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vendor {
    pub id: u64,
    pub name: String,
    pub description: String,
    // 平台名 -> 链接
    pub social: BTreeMap<String, String>,
    pub media: ShopMedia,
    pub address: VendorAddress,
}

/// 店铺横幅和头像
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ShopMedia {
    pub banner: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VendorAddress {
    pub street_1: String,
    pub street_2: String,
    pub city: String,
    pub zip: String,
    pub state: String,
    pub country: String,
}
