//! gRPC 状态码处理
//!
//! 提供 AccessLogError 到 tonic Status 的转换，以及 handler 错误的状态码分类

use super::AccessLogError;
use tonic::{Code, Status};

impl From<AccessLogError> for Status {
    fn from(err: AccessLogError) -> Self {
        match err {
            AccessLogError::Configuration(msg) => Status::internal(msg),
            other => Status::unknown(other.to_string()),
        }
    }
}

/// 携带 gRPC 状态码的错误
///
/// 两级分类：框架原生的 [`Status`] 返回其状态码，其它错误返回 `None`，
/// 由拦截器统一记为 [`Code::Unknown`]。
pub trait StatusCarrier {
    fn status_code(&self) -> Option<Code>;
}

impl StatusCarrier for Status {
    fn status_code(&self) -> Option<Code> {
        Some(self.code())
    }
}

impl StatusCarrier for anyhow::Error {
    fn status_code(&self) -> Option<Code> {
        self.downcast_ref::<Status>().map(Status::code)
    }
}

impl StatusCarrier for Box<dyn std::error::Error + Send + Sync> {
    fn status_code(&self) -> Option<Code> {
        self.downcast_ref::<Status>().map(Status::code)
    }
}

impl StatusCarrier for AccessLogError {
    fn status_code(&self) -> Option<Code> {
        None
    }
}

/// 将错误映射为记录中的整数状态码
pub fn grpc_status_code<E: StatusCarrier + ?Sized>(err: &E) -> i32 {
    err.status_code().unwrap_or(Code::Unknown) as i32
}
