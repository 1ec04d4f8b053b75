//! Client location middleware
//!
//! 在 `ClientIp` 基础上查询地理位置并存入 request extensions。
//! 查询失败不影响请求，只会得到 `ClientLocation(None)`。

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

use super::client_ip::ClientIp;
use crate::services::geoip::{GeoIpDb, Location};
use crate::utils::ip::{ProxyHeaderPolicy, client_ip_from_service_request};

/// 客户端地理位置（未挂载中间件或查询失败时为 None）
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientLocation(pub Option<Location>);

impl FromRequest for ClientLocation {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let location = req
            .extensions()
            .get::<ClientLocation>()
            .cloned()
            .unwrap_or_default();
        ready(Ok(location))
    }
}

/// Client location 中间件工厂
#[derive(Clone)]
pub struct LocationAnnotator {
    policy: Arc<ProxyHeaderPolicy>,
    db: GeoIpDb,
}

impl LocationAnnotator {
    pub fn new(policy: ProxyHeaderPolicy, db: GeoIpDb) -> Self {
        Self {
            policy: Arc::new(policy),
            db,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LocationAnnotator
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LocationService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LocationService {
            service: Rc::new(service),
            policy: self.policy.clone(),
            db: self.db.clone(),
        }))
    }
}

pub struct LocationService<S> {
    service: Rc<S>,
    policy: Arc<ProxyHeaderPolicy>,
    db: GeoIpDb,
}

impl<S, B> Service<ServiceRequest> for LocationService<S>
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
        let location = match self.db.get_location(&ip) {
            Ok(location) => Some(location),
            Err(e) => {
                debug!("GeoIP lookup skipped for {:?}: {}", ip, e);
                None
            }
        };

        {
            let mut extensions = req.extensions_mut();
            extensions.insert(ClientIp(ip));
            extensions.insert(ClientLocation(location));
        }

        Box::pin(async move { srv.call(req).await })
    }
}
