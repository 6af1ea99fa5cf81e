//! 扩展点
//!
//! 参数过滤器与自定义数据提供者，由调用方实现，拦截器在构建记录时调用。

pub mod filter;
pub mod provider;

pub use filter::{DEFAULT_PLACEHOLDER, KeyRedactionFilter, ParamsFilter};
pub use provider::CustomDataProvider;
