//! ipgeo - IP geolocation lookup
//!
//! Opens a MaxMind GeoIP2/GeoLite2 City database, resolves addresses into a
//! flat [`services::geoip::Location`], and provides actix-web middleware that
//! annotates each request with the client's IP (and optionally its location).
//!
//! # Architecture
//! - `services::geoip`: database handle and location resolver
//! - `utils::ip`: client IP extraction from proxy headers
//! - `api`: request annotation middleware and HTTP handlers
//! - `config`: configuration loading
//! - `runtime`: server and lookup execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
