//! 时钟抽象
//!
//! 墙上时间用于 `accessed_at`，单调时间用于计算耗时。

use std::time::Instant;

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    /// 当前墙上时间
    fn now(&self) -> DateTime<Utc>;

    /// 当前单调时间
    fn instant(&self) -> Instant;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// 冻结的时钟，两次读取之间耗时恒为 0
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
    instant: Instant,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            instant: Instant::now(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn instant(&self) -> Instant {
        self.instant
    }
}
