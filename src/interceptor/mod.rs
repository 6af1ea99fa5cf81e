//! gRPC 访问日志拦截器模块
//!
//! 仅支持一元调用；流式调用（server/client/bidi streaming）不做拦截。

pub mod access_log;
mod guard;

pub use access_log::AccessLogInterceptor;
