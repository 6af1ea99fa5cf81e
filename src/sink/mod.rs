//! 访问日志输出模块
//!
//! 拦截器完成记录后调用 [`Sink::accept`]，之后的写出与存储由实现自行负责。

pub mod event;
pub mod json_line;

pub use event::TracingSink;
pub use json_line::JsonLineSink;

use std::sync::{Arc, Mutex};

use crate::record::AccessLogRecord;

/// 访问日志接收端
///
/// 会被多个并发调用共享；也会在调用被取消时从 drop 中调用，实现不应 panic。
pub trait Sink: Send + Sync {
    fn accept(&self, record: AccessLogRecord);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn accept(&self, record: AccessLogRecord) {
        (**self).accept(record)
    }
}

/// 内存接收端，克隆后共享同一缓冲
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<AccessLogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已接收记录的快照
    pub fn records(&self) -> Vec<AccessLogRecord> {
        self.lock().clone()
    }

    /// 取出并清空已接收的记录
    pub fn take(&self) -> Vec<AccessLogRecord> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AccessLogRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for MemorySink {
    fn accept(&self, record: AccessLogRecord) {
        self.lock().push(record);
    }
}
