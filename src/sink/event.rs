use tracing::{info, warn};

use super::Sink;
use crate::record::AccessLogRecord;

/// 以 tracing 事件输出访问日志，target 为 `access_log`
///
/// 日志格式与输出位置由宿主进程的 subscriber 决定。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn accept(&self, record: AccessLogRecord) {
        match record.to_json() {
            Ok(json) => info!(target: "access_log", record = %json, "access log"),
            Err(err) => warn!(target: "access_log", error = %err, "Failed to encode access log record"),
        }
    }
}
