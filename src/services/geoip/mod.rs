//! GeoIP 服务模块
//!
//! 基于本地 MaxMind 数据库的 IP 地理位置查询

mod location;
mod maxmind;
mod provider;

pub use location::{
    CityRecord, CountryRecord, DISPLAY_LANGUAGE, Location, LocationRecord, TimezoneRecord,
};
pub use maxmind::MaxMindReader;
pub use provider::{GeoIpDb, LocationSource};
