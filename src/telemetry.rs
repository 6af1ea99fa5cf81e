//! 日志初始化
//!
//! 可选的进程级 subscriber 安装，宿主进程已有 subscriber 时无需调用。

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;
use crate::error::{AccessLogError, Result};

/// 安装全局 tracing subscriber
///
/// 过滤级别优先取 `RUST_LOG`，其次取配置；已存在全局 subscriber 时返回配置错误。
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|err| AccessLogError::configuration(format!("invalid log level: {err}")))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    result.map_err(|err| AccessLogError::configuration(err.to_string()))
}
