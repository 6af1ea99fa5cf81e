use std::any::Any;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{MethodDescriptor, ServerCall};

/// 自定义数据提供者
///
/// 两种形态：实现 `execute` 的类型，或签名为
/// `Fn(&dyn Any, &ServerCall, &MethodDescriptor) -> Map<String, Value>` 的闭包。
/// 请求以 `&dyn Any` 传入，可按具体消息类型 `downcast_ref`。
/// 返回的字段合并进记录，与基础字段同名时覆盖基础字段。
pub trait CustomDataProvider: Send + Sync {
    fn execute(
        &self,
        request: &dyn Any,
        call: &ServerCall,
        method: &MethodDescriptor,
    ) -> Result<Map<String, Value>>;
}

impl<F> CustomDataProvider for F
where
    F: Fn(&dyn Any, &ServerCall, &MethodDescriptor) -> Map<String, Value> + Send + Sync,
{
    fn execute(
        &self,
        request: &dyn Any,
        call: &ServerCall,
        method: &MethodDescriptor,
    ) -> Result<Map<String, Value>> {
        Ok(self(request, call, method))
    }
}
