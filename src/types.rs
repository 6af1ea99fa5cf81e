use std::fmt;
use std::net::SocketAddr;

use tonic::Request;
use tonic::metadata::MetadataMap;

use crate::utils::{grpc_method, peer_from_socket_addr};

/// 方法描述
///
/// `method_name` 为声明时的方法名，通常是 tonic 生成代码里的 snake_case 名称，
/// 例如 `hello_rpc`；拼接路径时会转换为 `HelloRpc`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub service_name: String,
    pub method_name: String,
}

impl MethodDescriptor {
    pub fn new(service_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            method_name: method_name.into(),
        }
    }

    /// 从 gRPC 路径解析，例如 `/helloworld.Greeter/SayHello`
    pub fn from_path(path: &str) -> Option<Self> {
        let mut parts = path.strip_prefix('/')?.splitn(2, '/');
        let service = parts.next().filter(|s| !s.is_empty())?;
        let method = parts.next().filter(|s| !s.is_empty() && !s.contains('/'))?;
        Some(Self::new(service, method))
    }

    /// 规范化路径 `/{service}/{PascalCaseMethod}`
    pub fn path(&self) -> String {
        grpc_method(self)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// 单次调用的上下文：对端地址与元数据
#[derive(Debug, Clone, Default)]
pub struct ServerCall {
    peer: Option<String>,
    metadata: MetadataMap,
}

impl ServerCall {
    pub fn new(peer: Option<String>, metadata: MetadataMap) -> Self {
        Self { peer, metadata }
    }

    /// 从 tonic 请求构建，对端格式为 `ipv4:a.b.c.d:port` 或 `ipv6:[addr]:port`
    pub fn from_request<T>(req: &Request<T>) -> Self {
        Self {
            peer: req.remote_addr().map(peer_from_socket_addr),
            metadata: req.metadata().clone(),
        }
    }

    pub fn from_socket_addr(addr: Option<SocketAddr>, metadata: MetadataMap) -> Self {
        Self {
            peer: addr.map(peer_from_socket_addr),
            metadata,
        }
    }

    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grpc_path() {
        let method = MethodDescriptor::from_path("/test.Test/HelloRpc").unwrap();
        assert_eq!(method.service_name, "test.Test");
        assert_eq!(method.method_name, "HelloRpc");
        assert_eq!(method.path(), "/test.Test/HelloRpc");
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(MethodDescriptor::from_path("test.Test/HelloRpc").is_none());
        assert!(MethodDescriptor::from_path("/test.Test").is_none());
        assert!(MethodDescriptor::from_path("/test.Test/").is_none());
        assert!(MethodDescriptor::from_path("//HelloRpc").is_none());
        assert!(MethodDescriptor::from_path("/a/b/c").is_none());
    }

    #[test]
    fn call_without_remote_addr_has_no_peer() {
        let call = ServerCall::from_request(&Request::new(()));
        assert_eq!(call.peer(), None);
        assert!(call.metadata().is_empty());
    }

    #[test]
    fn call_from_socket_addr_formats_peer() {
        let addr: SocketAddr = "127.0.0.1:63634".parse().unwrap();
        let call = ServerCall::from_socket_addr(Some(addr), MetadataMap::new());
        assert_eq!(call.peer(), Some("ipv4:127.0.0.1:63634"));
    }
}
