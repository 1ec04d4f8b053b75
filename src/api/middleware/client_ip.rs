//! Client IP middleware
//!
//! 为每个请求确定客户端 IP 并存入 request extensions，
//! handler 可以通过 `ClientIp` 提取器或 `req.extensions().get::<ClientIp>()` 获取。

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::trace;

use crate::utils::ip::{ProxyHeaderPolicy, client_ip_from_request, client_ip_from_service_request};

/// 客户端 IP（空字符串表示无法确定 IPv4 地址）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequest for ClientIp {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// 未挂载中间件时按默认策略（不信任代理头）现场计算
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ip = req
            .extensions()
            .get::<ClientIp>()
            .cloned()
            .unwrap_or_else(|| ClientIp(client_ip_from_request(req, &ProxyHeaderPolicy::default())));
        ready(Ok(ip))
    }
}

/// Client IP 中间件工厂
#[derive(Clone, Default)]
pub struct ClientIpAnnotator {
    policy: Arc<ProxyHeaderPolicy>,
}

impl ClientIpAnnotator {
    pub fn new(policy: ProxyHeaderPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClientIpAnnotator
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClientIpService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClientIpService {
            service: Rc::new(service),
            policy: self.policy.clone(),
        }))
    }
}

pub struct ClientIpService<S> {
    service: Rc<S>,
    policy: Arc<ProxyHeaderPolicy>,
}

impl<S, B> Service<ServiceRequest> for ClientIpService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        let ip = client_ip_from_service_request(&req, &self.policy);
        trace!("Client IP for {} {}: {:?}", req.method(), req.path(), ip);
        req.extensions_mut().insert(ClientIp(ip));

        Box::pin(async move { srv.call(req).await })
    }
}
