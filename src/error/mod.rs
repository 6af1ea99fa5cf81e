//! 访问日志错误处理模块
//!
//! 区分两类失败：记录构建失败（字段提取、过滤器、自定义数据）与配置错误。
//! 业务 handler 自身的错误不经过这里，原样返回给调用方。

pub mod grpc;

pub use grpc::StatusCarrier;

use thiserror::Error;

/// 访问日志错误类型
#[derive(Error, Debug)]
pub enum AccessLogError {
    /// 请求或元数据序列化失败
    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 请求序列化后不是对象，无法作为参数映射
    #[error("request does not serialize to a field mapping (got {kind})")]
    ParamsNotAMapping { kind: &'static str },

    /// 元数据值无法解析
    #[error("invalid metadata value for `{key}`: {reason}")]
    InvalidMetadata { key: String, reason: String },

    /// 参数过滤器执行失败
    #[error("params filter failed: {0}")]
    Filter(String),

    /// 自定义数据提供者执行失败
    #[error("custom data provider failed: {0}")]
    CustomData(String),

    /// 配置错误（构造期致命错误）
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccessLogError {
    /// 创建配置错误
    pub fn configuration(msg: impl Into<String>) -> Self {
        AccessLogError::Configuration(msg.into())
    }

    /// 创建过滤器错误
    pub fn filter(msg: impl Into<String>) -> Self {
        AccessLogError::Filter(msg.into())
    }

    /// 创建自定义数据错误
    pub fn custom_data(msg: impl Into<String>) -> Self {
        AccessLogError::CustomData(msg.into())
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, AccessLogError::Configuration(_))
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AccessLogError>;
