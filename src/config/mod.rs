use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub vendor_api_url: String,
    pub vendor_page_size: u32,
    pub vendor_api_timeout_secs: u64,
    pub wc_consumer_key: Option<String>,
    pub wc_consumer_secret: Option<String>,
    pub rate_limit_max_addresses: u64,
    pub rate_limit_ttl_ms: u64,
    pub rate_limit_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            vendor_api_url: env::var("VENDOR_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            vendor_page_size: parse_or("VENDOR_PAGE_SIZE", 100),
            vendor_api_timeout_secs: parse_or("VENDOR_API_TIMEOUT_SECS", 10),
            wc_consumer_key: env::var("WC_CONSUMER_KEY").ok(),
            wc_consumer_secret: env::var("WC_CONSUMER_SECRET").ok(),
            rate_limit_max_addresses: parse_or("RATE_LIMIT_MAX_ADDRESSES", 500),
            rate_limit_ttl_ms: parse_or("RATE_LIMIT_TTL_MS", 60_000),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 30),
        })
    }

    /// 指向给定远端地址的默认配置，测试和本地调试用
    pub fn with_vendor_api(vendor_api_url: impl Into<String>) -> Self {
        Config {
            server_host: "127.0.0.1".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            vendor_api_url: vendor_api_url.into(),
            vendor_page_size: 100,
            vendor_api_timeout_secs: 10,
            wc_consumer_key: None,
            wc_consumer_secret: None,
            rate_limit_max_addresses: 500,
            rate_limit_ttl_ms: 60_000,
            rate_limit_requests: 30,
        }
    }

    pub fn rate_limit_ttl(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ttl_ms)
    }

    pub fn vendor_api_timeout(&self) -> Duration {
        Duration::from_secs(self.vendor_api_timeout_secs)
    }
}

// 变量缺失或格式错误时使用默认值
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
