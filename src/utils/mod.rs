//! 字段提取工具函数
//!
//! 从调用上下文与方法描述中推导访问日志的各个字段，均为纯函数。

use std::net::SocketAddr;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tonic::metadata::{KeyAndValueRef, MetadataMap};

use crate::error::{AccessLogError, Result};
use crate::types::MethodDescriptor;

/// User-Agent 元数据键
pub const USER_AGENT_KEY: &str = "user-agent";

/// 唯一识别的对端地址前缀
const IPV4_PEER_PREFIX: &str = "ipv4:";

/// `accessed_at` 的时间格式（微秒精度）
const ACCESSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// 提取远端地址
///
/// 对端通常形如 `ipv4:127.0.0.1:63634`，其它形式返回 `None`。
pub fn remote_addr(peer: Option<&str>) -> Option<String> {
    peer?
        .strip_prefix(IPV4_PEER_PREFIX)?
        .split(':')
        .next()
        .filter(|addr| !addr.is_empty())
        .map(|addr| addr.to_string())
}

/// 将 socket 地址格式化为对端字符串
///
/// 双栈监听下的 IPv4 映射地址（`::ffff:a.b.c.d`）按 IPv4 输出。
pub fn peer_from_socket_addr(addr: SocketAddr) -> String {
    match addr {
        SocketAddr::V4(v4) => format!("ipv4:{}:{}", v4.ip(), v4.port()),
        SocketAddr::V6(v6) => match v6.ip().to_ipv4_mapped() {
            Some(ip) => format!("ipv4:{}:{}", ip, v6.port()),
            None => format!("ipv6:[{}]:{}", v6.ip(), v6.port()),
        },
    }
}

/// 规范化方法路径：`/{service}/{PascalCaseMethod}`
pub fn grpc_method(method: &MethodDescriptor) -> String {
    format!("/{}/{}", method.service_name, camelize(&method.method_name))
}

/// snake_case 转 PascalCase，每段首字母大写
///
/// 段内其余字符保持不变，已是 PascalCase 的名称原样返回。
pub fn camelize(term: &str) -> String {
    term.split('_').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 提取 User-Agent
pub fn user_agent(metadata: &MetadataMap) -> Option<String> {
    metadata
        .get(USER_AGENT_KEY)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// 元数据序列化为 JSON 字符串，二进制值使用 base64
pub fn jsonize_metadata(metadata: &MetadataMap) -> Result<String> {
    let mut map = Map::new();

    for entry in metadata.iter() {
        match entry {
            KeyAndValueRef::Ascii(key, value) => {
                let value = match value.to_str() {
                    Ok(text) => text.to_string(),
                    // 非可见 ASCII，按原始字节编码
                    Err(_) => STANDARD.encode(value.as_encoded_bytes()),
                };
                map.insert(key.as_str().to_string(), Value::String(value));
            }
            KeyAndValueRef::Binary(key, value) => {
                let bytes = value.to_bytes().map_err(|err| AccessLogError::InvalidMetadata {
                    key: key.as_str().to_string(),
                    reason: err.to_string(),
                })?;
                map.insert(key.as_str().to_string(), Value::String(STANDARD.encode(bytes)));
            }
        }
    }

    Ok(serde_json::to_string(&map)?)
}

/// 请求序列化为字段映射
///
/// 单元类型等序列化为 `null` 的请求视为空映射。
pub fn request_params<M: Serialize + ?Sized>(request: &M) -> Result<Map<String, Value>> {
    match serde_json::to_value(request)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(AccessLogError::ParamsNotAMapping {
            kind: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 格式化访问时间（UTC，微秒精度）
pub fn format_accessed_at(at: DateTime<Utc>) -> String {
    at.format(ACCESSED_AT_FORMAT).to_string()
}

/// 耗时毫秒数
pub fn response_time_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}
