//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 MaxMind GeoLite2-City.mmdb 文件进行 IP 地理位置查询

use std::net::IpAddr;

use maxminddb::Reader;
use tracing::trace;

use super::location::LocationRecord;
use super::provider::LocationSource;
use crate::errors::{GeoIpError, LookupError};

/// MaxMind 数据库句柄
///
/// 只对外暴露 `LocationSource::lookup`，读取器本身不公开。
pub struct MaxMindReader {
    reader: Reader<Vec<u8>>,
}

impl MaxMindReader {
    /// 从文件路径打开数据库
    pub fn open(path: &str) -> Result<Self, GeoIpError> {
        let reader = Reader::open_readfile(path).map_err(|source| GeoIpError::DatabaseOpen {
            path: path.to_string(),
            source,
        })?;

        trace!(
            "Opened MaxMind database {} ({} nodes, type {})",
            path, reader.metadata.node_count, reader.metadata.database_type
        );

        Ok(Self { reader })
    }
}

impl LocationSource for MaxMindReader {
    fn lookup(&self, ip: IpAddr) -> Result<LocationRecord, LookupError> {
        let result = self.reader.lookup(ip)?;
        let record: Option<LocationRecord> = result.decode()?;
        record.ok_or(LookupError::NotFound)
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
