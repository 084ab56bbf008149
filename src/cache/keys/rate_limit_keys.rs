/// 无法识别客户端地址时使用的固定键，所有此类请求共享同一个计数器
pub const UNKNOWN_CLIENT: &str = "unknown";

/// 生成限流计数键
pub fn rate_limit_key(client_address: &str) -> String {
    let address = client_address.trim();
    if address.is_empty() {
        format!("rate_limit:{}", UNKNOWN_CLIENT)
    } else {
        format!("rate_limit:{}", address)
    }
}
