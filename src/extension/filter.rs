use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::Result;

/// 默认脱敏占位符
pub const DEFAULT_PLACEHOLDER: &str = "[FILTERED]";

/// 参数过滤器
///
/// 接收请求字段映射的副本，返回序列化前的结果。每次调用至多执行一次。
pub trait ParamsFilter: Send + Sync {
    fn filter(&self, params: Map<String, Value>) -> Result<Map<String, Value>>;
}

impl<F> ParamsFilter for F
where
    F: Fn(Map<String, Value>) -> Map<String, Value> + Send + Sync,
{
    fn filter(&self, params: Map<String, Value>) -> Result<Map<String, Value>> {
        Ok(self(params))
    }
}

/// 按键名脱敏
///
/// 任意嵌套层级（对象或数组内）命中的键，其值替换为占位符。
#[derive(Debug, Clone)]
pub struct KeyRedactionFilter {
    keys: HashSet<String>,
    placeholder: String,
}

impl KeyRedactionFilter {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    fn redact_map(&self, map: &mut Map<String, Value>) {
        for (key, value) in map.iter_mut() {
            if self.keys.contains(key) {
                *value = Value::String(self.placeholder.clone());
            } else {
                self.redact_value(value);
            }
        }
    }

    fn redact_value(&self, value: &mut Value) {
        match value {
            Value::Object(map) => self.redact_map(map),
            Value::Array(items) => items.iter_mut().for_each(|item| self.redact_value(item)),
            _ => {}
        }
    }
}

impl ParamsFilter for KeyRedactionFilter {
    fn filter(&self, mut params: Map<String, Value>) -> Result<Map<String, Value>> {
        self.redact_map(&mut params);
        Ok(params)
    }
}
