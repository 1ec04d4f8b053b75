//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{
    App, HttpServer,
    middleware::{Condition, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{ClientIpAnnotator, LocationAnnotator};
use crate::api::services::{AppStartTime, health_routes, lookup_routes};
use crate::config::StaticConfig;
use crate::services::geoip::GeoIpDb;

/// Run the HTTP server
///
/// The GeoIP database is opened before binding; failure to open it aborts
/// startup with an error.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::default();

    let db = GeoIpDb::open(&config.geoip.database_path).map_err(|e| {
        tracing::error!("{}", e);
        anyhow::Error::new(e)
    })?;

    let policy = config.proxy.clone();
    if policy.trust_proxy_headers {
        warn!(
            "Proxy headers are trusted ({}). Only enable this behind a reverse proxy \
             that overwrites them, clients can set any of these headers.",
            policy.headers.join(", ")
        );
    } else {
        info!("Proxy headers are ignored, using connection address");
    }

    let attach_location = config.geoip.attach_location;
    info!(
        "Request annotation: ip{}",
        if attach_location { " + location" } else { "" }
    );

    let workers = config.server.workers.clamp(1, 32);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(Condition::new(
                !attach_location,
                ClientIpAnnotator::new(policy.clone()),
            ))
            .wrap(Condition::new(
                attach_location,
                LocationAnnotator::new(policy.clone(), db.clone()),
            ))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .service(health_routes())
            .configure(lookup_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?;

    warn!("Starting server at http://{} ({} workers)", bind_address, workers);
    server.run().await?;

    Ok(())
}
