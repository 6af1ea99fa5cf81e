use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tonic::{Request, Response};

use super::guard::RecordGuard;
use crate::clock::{Clock, SystemClock};
use crate::config::AccessLogConfig;
use crate::error::{AccessLogError, Result, StatusCarrier};
use crate::extension::{CustomDataProvider, ParamsFilter};
use crate::record::{AccessLogRecord, fields};
use crate::sink::{JsonLineSink, Sink};
use crate::types::{MethodDescriptor, ServerCall};
use crate::utils;

/// 访问日志拦截器
///
/// 包裹一元调用的 handler，每次调用恰好产生一条 [`AccessLogRecord`] 并交给 [`Sink`]，
/// handler 的结果（成功值或错误）原样返回。构造后不可变，可在并发调用间共享。
///
/// ```rust,ignore
/// use grpc_access_log::{AccessLogInterceptor, KeyRedactionFilter, MethodDescriptor};
///
/// let access_log = AccessLogInterceptor::new()
///     .with_params_filter(KeyRedactionFilter::new(["password"]));
///
/// // 在服务实现中
/// async fn say_hello(&self, request: Request<HelloRequest>) -> Result<Response<HelloReply>, Status> {
///     let method = MethodDescriptor::new("helloworld.Greeter", "say_hello");
///     self.access_log
///         .intercept_unary(request, &method, |req| self.inner.say_hello(req))
///         .await
/// }
/// ```
#[derive(Clone)]
pub struct AccessLogInterceptor {
    sink: Arc<dyn Sink>,
    params_filter: Option<Arc<dyn ParamsFilter>>,
    custom_data_provider: Option<Arc<dyn CustomDataProvider>>,
    clock: Arc<dyn Clock>,
}

impl AccessLogInterceptor {
    /// 默认配置：输出 JSON 行到标准输出，不过滤参数，无自定义数据
    pub fn new() -> Self {
        Self {
            sink: Arc::new(JsonLineSink::stdout()),
            params_filter: None,
            custom_data_provider: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// 从配置文件构建
    pub fn from_config(config: &AccessLogConfig) -> Result<Self> {
        let mut interceptor = Self::new().with_shared_sink(config.sink.build()?);

        if let Some(filter) = config.filter.build() {
            interceptor = interceptor.with_params_filter(filter);
        }

        Ok(interceptor)
    }

    pub fn with_sink(self, sink: impl Sink + 'static) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    pub fn with_shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_params_filter(mut self, filter: impl ParamsFilter + 'static) -> Self {
        self.params_filter = Some(Arc::new(filter));
        self
    }

    pub fn with_custom_data_provider(mut self, provider: impl CustomDataProvider + 'static) -> Self {
        self.custom_data_provider = Some(Arc::new(provider));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// 拦截 tonic 一元调用
    ///
    /// 调用上下文取自请求的远端地址与元数据，请求随后交给 handler。
    pub async fn intercept_unary<M, R, E, F, Fut>(
        &self,
        request: Request<M>,
        method: &MethodDescriptor,
        handler: F,
    ) -> std::result::Result<Response<R>, E>
    where
        M: Serialize + Any,
        F: FnOnce(Request<M>) -> Fut,
        Fut: Future<Output = std::result::Result<Response<R>, E>>,
        E: StatusCarrier + From<AccessLogError>,
    {
        let mut guard = RecordGuard::new(self.clock.as_ref(), self.sink.as_ref());
        let call = ServerCall::from_request(&request);

        if let Err(err) = self.populate(guard.record_mut(), request.get_ref(), &call, method) {
            return Err(guard.construction_failed(err));
        }

        let result = handler(request).await;
        guard.complete(&result);
        result
    }

    /// 拦截一元调用（与框架无关的形式）
    ///
    /// `handler` 恰好调用一次；记录构建失败时不调用 handler，错误经 `From` 转换后返回。
    pub async fn intercept<M, T, E, F, Fut>(
        &self,
        request: &M,
        call: &ServerCall,
        method: &MethodDescriptor,
        handler: F,
    ) -> std::result::Result<T, E>
    where
        M: Serialize + Any,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: StatusCarrier + From<AccessLogError>,
    {
        let mut guard = RecordGuard::new(self.clock.as_ref(), self.sink.as_ref());

        if let Err(err) = self.populate(guard.record_mut(), request, call, method) {
            return Err(guard.construction_failed(err));
        }

        let result = handler().await;
        guard.complete(&result);
        result
    }

    /// 填充记录字段
    ///
    /// 基础字段全部计算成功后才一次性写入，任一失败则记录中不含任何基础字段。
    fn populate<M>(
        &self,
        record: &mut AccessLogRecord,
        request: &M,
        call: &ServerCall,
        method: &MethodDescriptor,
    ) -> Result<()>
    where
        M: Serialize + Any,
    {
        let accessed_at = self.clock.now();

        let base = [
            (
                fields::REMOTE_ADDR,
                utils::remote_addr(call.peer()).map_or(Value::Null, Value::String),
            ),
            (
                fields::ACCESSED_AT,
                Value::String(utils::format_accessed_at(accessed_at)),
            ),
            (fields::PARAMS, Value::String(self.params(request)?)),
            (
                fields::USER_AGENT,
                utils::user_agent(call.metadata()).map_or(Value::Null, Value::String),
            ),
            (fields::GRPC_METHOD, Value::String(utils::grpc_method(method))),
            (
                fields::GRPC_METADATA,
                Value::String(utils::jsonize_metadata(call.metadata())?),
            ),
        ];
        for (key, value) in base {
            record.insert(key, value);
        }

        if let Some(provider) = &self.custom_data_provider {
            let custom = provider.execute(request as &dyn Any, call, method)?;
            record.merge(custom);
        }

        Ok(())
    }

    fn params<M: Serialize>(&self, request: &M) -> Result<String> {
        let params = utils::request_params(request)?;
        let params = match &self.params_filter {
            Some(filter) => filter.filter(params)?,
            None => params,
        };
        Ok(serde_json::to_string(&params)?)
    }
}

impl Default for AccessLogInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AccessLogInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogInterceptor")
            .field("params_filter", &self.params_filter.is_some())
            .field("custom_data_provider", &self.custom_data_provider.is_some())
            .finish_non_exhaustive()
    }
}
