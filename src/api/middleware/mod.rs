pub mod client_ip;
pub mod location;

pub use client_ip::{ClientIp, ClientIpAnnotator};
pub use location::{ClientLocation, LocationAnnotator};
