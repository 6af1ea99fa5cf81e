use std::time::Instant;

use tonic::Code;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{AccessLogError, StatusCarrier, grpc::grpc_status_code};
use crate::record::{AccessLogRecord, fields};
use crate::sink::Sink;
use crate::utils::response_time_ms;

/// 单次调用的记录守卫
///
/// 持有记录直到 drop：无论正常返回、提前返回、handler panic 还是 future 被取消，
/// drop 时都会写入状态码与耗时并交给 sink。未设置状态码时记为 `Unknown`。
pub(crate) struct RecordGuard<'a> {
    record: AccessLogRecord,
    started: Instant,
    status: Option<i32>,
    clock: &'a dyn Clock,
    sink: &'a dyn Sink,
}

impl<'a> RecordGuard<'a> {
    pub(crate) fn new(clock: &'a dyn Clock, sink: &'a dyn Sink) -> Self {
        Self {
            record: AccessLogRecord::new(),
            started: clock.instant(),
            status: None,
            clock,
            sink,
        }
    }

    pub(crate) fn record_mut(&mut self) -> &mut AccessLogRecord {
        &mut self.record
    }

    /// 记录 handler 的结果
    pub(crate) fn complete<T, E: StatusCarrier>(&mut self, result: &Result<T, E>) {
        self.status = Some(match result {
            Ok(_) => Code::Ok as i32,
            Err(err) => grpc_status_code(err),
        });
    }

    /// 记录构建失败，转换为调用方的错误类型
    pub(crate) fn construction_failed<E: From<AccessLogError>>(&mut self, err: AccessLogError) -> E {
        warn!(error = %err, "Failed to build access log record");
        self.status = Some(Code::Unknown as i32);
        E::from(err)
    }
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        let status = self.status.unwrap_or(Code::Unknown as i32);
        let elapsed = self.clock.instant().saturating_duration_since(self.started);
        let elapsed_ms = response_time_ms(elapsed);

        let mut record = std::mem::take(&mut self.record);
        record.insert(fields::GRPC_STATUS_CODE, status);
        record.insert(fields::RESPONSE_TIME_MS, elapsed_ms);

        debug!(
            grpc_method = record
                .get(fields::GRPC_METHOD)
                .and_then(|v| v.as_str())
                .unwrap_or("unknown"),
            grpc_status_code = status,
            response_time_ms = elapsed_ms,
            "Access log record emitted"
        );

        self.sink.accept(record);
    }
}
