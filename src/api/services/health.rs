//! 健康检查接口

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::Instant;
use tracing::trace;

use crate::services::geoip::GeoIpDb;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub started: Instant,
}

impl Default for AppStartTime {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub uptime: u64,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        db: web::Data<GeoIpDb>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");
        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            provider: db.source_name(),
            uptime: app_start_time.started.elapsed().as_secs(),
        })
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
