use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// 限流计数项
///
/// 计数器在整个窗口内共享，自增不会延长过期时间
#[derive(Debug)]
pub struct RateLimitEntry {
    count: AtomicU32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitEntry {
    pub fn new(ttl: Duration) -> Self {
        let window = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let reset_at = Utc::now()
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            count: AtomicU32::new(0),
            reset_at,
        }
    }

    /// 自增并返回自增后的计数
    pub fn increment(&self) -> u32 {
        let previous = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                Some(c.saturating_add(1))
            })
            .unwrap_or(u32::MAX);
        previous.saturating_add(1)
    }

    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// 距离窗口重置的剩余时间
    pub fn remaining(&self) -> Duration {
        (self.reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_returns_post_increment_count() {
        let entry = RateLimitEntry::new(Duration::from_secs(60));
        assert_eq!(entry.increment(), 1);
        assert_eq!(entry.increment(), 2);
        assert_eq!(entry.count(), 2);
    }

    #[test]
    fn remaining_is_bounded_by_window() {
        let entry = RateLimitEntry::new(Duration::from_secs(60));
        let remaining = entry.remaining();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(55));
    }
}
