use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AccessLogError, Result};
use crate::extension::{DEFAULT_PLACEHOLDER, KeyRedactionFilter};
use crate::sink::{JsonLineSink, Sink, TracingSink};

/// 访问日志配置
///
/// ```toml
/// [sink]
/// kind = "file"
/// path = "/var/log/app/access.log"
///
/// [filter]
/// keys = ["password", "token"]
///
/// [logging]
/// level = "info"
/// json = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessLogConfig {
    pub sink: SinkConfig,
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    Stderr,
    Tracing,
    File,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub path: Option<PathBuf>, // 仅 file 使用
}

impl SinkConfig {
    pub fn build(&self) -> Result<Arc<dyn Sink>> {
        let sink: Arc<dyn Sink> = match self.kind {
            SinkKind::Stdout => Arc::new(JsonLineSink::stdout()),
            SinkKind::Stderr => Arc::new(JsonLineSink::stderr()),
            SinkKind::Tracing => Arc::new(TracingSink::new()),
            SinkKind::File => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| AccessLogError::configuration("file sink requires `path`"))?;
                Arc::new(JsonLineSink::file(path)?)
            }
        };
        Ok(sink)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub keys: Vec<String>,
    pub placeholder: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl FilterConfig {
    /// 键列表为空时不安装过滤器
    pub fn build(&self) -> Option<KeyRedactionFilter> {
        if self.keys.is_empty() {
            return None;
        }
        Some(KeyRedactionFilter::new(self.keys.iter().cloned()).placeholder(self.placeholder.clone()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl AccessLogConfig {
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| AccessLogError::configuration(err.to_string()))
    }
}
