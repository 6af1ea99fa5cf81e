//! 访问日志记录

use serde::Serialize;
use serde_json::{Map, Value};

/// 记录字段名
pub mod fields {
    pub const REMOTE_ADDR: &str = "remote_addr";
    pub const ACCESSED_AT: &str = "accessed_at";
    pub const PARAMS: &str = "params";
    pub const USER_AGENT: &str = "user_agent";
    pub const GRPC_METHOD: &str = "grpc_method";
    pub const GRPC_METADATA: &str = "grpc_metadata";
    pub const GRPC_STATUS_CODE: &str = "grpc_status_code";
    pub const RESPONSE_TIME_MS: &str = "response_time_ms";
}

/// 访问日志记录，字段名到 JSON 值的映射
///
/// 每次调用创建一次，逐步填充，交给 [`Sink`](crate::sink::Sink) 后不再修改。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AccessLogRecord {
    fields: Map<String, Value>,
}

impl AccessLogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// 合并字段，同名字段以新值为准
    pub fn merge(&mut self, other: Map<String, Value>) {
        self.fields.extend(other);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn status_code(&self) -> Option<i64> {
        self.get(fields::GRPC_STATUS_CODE).and_then(Value::as_i64)
    }

    pub fn response_time_ms(&self) -> Option<f64> {
        self.get(fields::RESPONSE_TIME_MS).and_then(Value::as_f64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// 序列化为单行 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut record = AccessLogRecord::new();
        record.insert(fields::GRPC_STATUS_CODE, 0);
        record.insert("foo", false);

        let mut extra = Map::new();
        extra.insert("foo".to_string(), json!(true));
        record.merge(extra);

        assert_eq!(record.get("foo"), Some(&json!(true)));
        assert_eq!(record.status_code(), Some(0));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut record = AccessLogRecord::new();
        record.insert(fields::GRPC_STATUS_CODE, 2);
        record.insert(fields::RESPONSE_TIME_MS, 0.0);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"grpc_status_code": 2, "response_time_ms": 0.0})
        );
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"grpc_status_code":2,"response_time_ms":0.0}"#
        );
    }

    #[test]
    fn exposes_underlying_map() {
        let mut record = AccessLogRecord::new();
        assert!(record.is_empty());
        record.insert(fields::REMOTE_ADDR, Value::Null);

        assert!(record.contains_key(fields::REMOTE_ADDR));
        assert!(!record.contains_key(fields::USER_AGENT));
        assert_eq!(record.as_map().get(fields::REMOTE_ADDR), Some(&Value::Null));

        let map = record.into_map();
        assert_eq!(Value::Object(map), json!({"remote_addr": null}));
    }
}
