//! 地理位置查询接口
//!
//! `GET /` 返回调用方自身的 IP 与位置，`GET /lookup/{ip}` 查询任意地址。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::middleware::{ClientIp, ClientLocation};
use crate::errors::GeoIpError;
use crate::services::geoip::{GeoIpDb, Location};

/// `GET /` 响应体
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub ip: String,
    pub location: Option<Location>,
}

pub struct LookupService;

impl LookupService {
    /// 返回中间件为当前请求确定的 IP 与位置
    pub async fn whoami(ip: ClientIp, location: ClientLocation) -> impl Responder {
        HttpResponse::Ok().json(WhoAmIResponse {
            ip: ip.0,
            location: location.0,
        })
    }

    #[instrument(skip(db))]
    pub async fn lookup(ip: web::Path<String>, db: web::Data<GeoIpDb>) -> impl Responder {
        let ip = ip.into_inner();
        match db.get_location(&ip) {
            Ok(location) => HttpResponse::Ok().json(location),
            Err(e) => {
                debug!("Lookup failed: {}", e);
                error_response(&e)
            }
        }
    }
}

fn error_response(err: &GeoIpError) -> HttpResponse {
    let status = match err {
        GeoIpError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        GeoIpError::LookupFailure { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(serde_json::json!({
        "code": status.as_u16(),
        "data": { "error": err.message() }
    }))
}

pub fn lookup_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(LookupService::whoami))
        .route("/lookup/{ip}", web::get().to(LookupService::lookup));
}
