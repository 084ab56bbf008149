use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::cache::keys::rate_limit_key;
use crate::cache::models::rate_limit::RateLimitEntry;
use crate::config::Config;

/// 请求次数超过限额
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitError {
    pub limit: u32,
    pub retry_after: Duration,
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rate limit of {} requests exceeded, retry after {}s",
            self.limit,
            self.retry_after_secs()
        )
    }
}

impl std::error::Error for RateLimitError {}

impl RateLimitError {
    /// 向上取整的重试秒数，至少为1
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        let secs = if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        };
        secs.max(1)
    }
}

/// 进程内限流器
///
/// 按客户端地址计数，计数项在创建后 `ttl` 过期；跟踪的地址数超过容量时按LRU淘汰
pub struct RateLimiter {
    entries: Cache<String, Arc<RateLimitEntry>>,
    ttl: Duration,
}

impl RateLimiter {
    pub fn new(max_addresses: u64, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_addresses)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { entries, ttl }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_max_addresses, config.rate_limit_ttl())
    }

    /// 记录一次请求，返回当前窗口内的计数
    ///
    /// 计数超过 `limit` 时返回 [`RateLimitError`]
    pub fn check(&self, client_address: &str, limit: u32) -> Result<u32, RateLimitError> {
        let key = rate_limit_key(client_address);
        let ttl = self.ttl;
        let entry = self
            .entries
            .get_with(key, || Arc::new(RateLimitEntry::new(ttl)));

        let count = entry.increment();
        if count > limit {
            tracing::debug!(
                "Rate limit exceeded for {}: {} > {}",
                client_address,
                count,
                limit
            );
            return Err(RateLimitError {
                limit,
                retry_after: entry.remaining(),
            });
        }

        Ok(count)
    }

    /// 当前跟踪的地址数
    pub fn tracked_addresses(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::UNKNOWN_CLIENT;

    fn limiter() -> RateLimiter {
        RateLimiter::new(500, Duration::from_secs(60))
    }

    #[test]
    fn allows_exactly_limit_calls() {
        let limiter = limiter();
        for expected in 1..=5 {
            assert_eq!(limiter.check("1.2.3.4", 5), Ok(expected));
        }

        let err = limiter.check("1.2.3.4", 5).unwrap_err();
        assert_eq!(err.limit, 5);
        assert!(err.retry_after <= Duration::from_secs(60));
        assert!(limiter.check("1.2.3.4", 5).is_err());
    }

    #[test]
    fn addresses_have_independent_quotas() {
        let limiter = limiter();
        for _ in 0..3 {
            limiter.check("10.0.0.1", 3).unwrap();
        }
        assert!(limiter.check("10.0.0.1", 3).is_err());

        assert_eq!(limiter.check("10.0.0.2", 3), Ok(1));
        assert_eq!(limiter.tracked_addresses(), 2);
    }

    #[test]
    fn blank_addresses_share_fallback_counter() {
        let limiter = limiter();
        limiter.check("", 2).unwrap();
        limiter.check(UNKNOWN_CLIENT, 2).unwrap();
        assert!(limiter.check("   ", 2).is_err());
    }

    #[test]
    fn counter_lapses_after_ttl() {
        let limiter = RateLimiter::new(500, Duration::from_millis(100));
        limiter.check("1.2.3.4", 1).unwrap();
        assert!(limiter.check("1.2.3.4", 1).is_err());

        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(limiter.check("1.2.3.4", 1), Ok(1));
    }

    #[test]
    fn capacity_bounds_tracked_addresses() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        for address in ["a", "b", "c", "d"] {
            limiter.check(address, 10).unwrap();
        }
        assert!(limiter.tracked_addresses() <= 2);
    }

    #[test]
    fn full_store_evicts_least_recently_used_address() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        // tracked_addresses 会先跑完淘汰任务
        assert_eq!(limiter.check("a", 10), Ok(1));
        assert_eq!(limiter.check("b", 10), Ok(1));
        assert_eq!(limiter.tracked_addresses(), 2);

        assert_eq!(limiter.check("a", 10), Ok(2));
        limiter.tracked_addresses();
        assert_eq!(limiter.check("c", 10), Ok(1));
        assert_eq!(limiter.tracked_addresses(), 2);

        assert_eq!(limiter.check("a", 10), Ok(3));
        assert_eq!(limiter.check("b", 10), Ok(1));
    }

    #[test]
    fn concurrent_checks_are_counted_once_each() {
        let limiter = limiter();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        limiter.check("9.9.9.9", u32::MAX).unwrap();
                    }
                });
            }
        });
        assert_eq!(limiter.check("9.9.9.9", u32::MAX), Ok(801));
    }

    #[test]
    fn retry_after_rounds_up() {
        let err = RateLimitError {
            limit: 1,
            retry_after: Duration::from_millis(1500),
        };
        assert_eq!(err.retry_after_secs(), 2);

        let err = RateLimitError {
            limit: 1,
            retry_after: Duration::ZERO,
        };
        assert_eq!(err.retry_after_secs(), 1);
    }
}
