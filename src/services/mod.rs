//! Service layer
//!
//! Lookup logic shared by the HTTP server and the CLI.

pub mod geoip;

pub use geoip::{GeoIpDb, Location, LocationSource};
