//! GeoIP 查询抽象层
//!
//! `LocationSource` 是数据源的最小接口（只有 lookup），
//! `GeoIpDb` 在其上做地址校验和结果整形。

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{info, trace};

use super::location::{Location, LocationRecord};
use super::maxmind::MaxMindReader;
use crate::errors::{GeoIpError, LookupError};

/// GeoIP 数据源
///
/// 实现必须支持并发只读查询。
pub trait LocationSource: Send + Sync {
    /// 查询 IP 地址对应的原始记录
    fn lookup(&self, ip: IpAddr) -> Result<LocationRecord, LookupError>;

    /// 获取数据源名称（用于日志）
    fn name(&self) -> &'static str;
}

/// GeoIP 数据库句柄
///
/// 进程内只打开一次，克隆只增加引用计数。
#[derive(Clone)]
pub struct GeoIpDb {
    inner: Arc<dyn LocationSource>,
}

impl GeoIpDb {
    /// 打开 MaxMind 数据库文件
    ///
    /// 打开失败时返回错误，由调用方决定是否终止进程。
    pub fn open(path: &str) -> Result<Self, GeoIpError> {
        let reader = MaxMindReader::open(path)?;
        info!("GeoIP: Using MaxMind database at {}", path);
        Ok(Self::from_source(Arc::new(reader)))
    }

    /// 使用任意数据源构建
    pub fn from_source(source: Arc<dyn LocationSource>) -> Self {
        Self { inner: source }
    }

    /// 查询 IP 地址的地理位置
    ///
    /// 地址无法解析时返回 `InvalidAddress`，不会发起查询。
    pub fn get_location(&self, ip: &str) -> Result<Location, GeoIpError> {
        let ip_addr: IpAddr = ip.parse().map_err(|_| GeoIpError::invalid_address(ip))?;

        let record = self
            .inner
            .lookup(ip_addr)
            .map_err(|source| GeoIpError::LookupFailure { ip: ip_addr, source })?;

        let location = Location::from_record(ip, record);
        trace!(
            "{} lookup for {}: country={:?}, city={:?}",
            self.inner.name(),
            ip,
            location.country,
            location.city
        );

        Ok(location)
    }

    /// 获取当前数据源名称
    pub fn source_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl std::fmt::Debug for GeoIpDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoIpDb")
            .field("source", &self.inner.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geoip::location::{CityRecord, CountryRecord, TimezoneRecord};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemorySource {
        records: HashMap<IpAddr, LocationRecord>,
        calls: AtomicUsize,
    }

    impl LocationSource for MemorySource {
        fn lookup(&self, ip: IpAddr) -> Result<LocationRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.get(&ip).cloned().ok_or(LookupError::NotFound)
        }

        fn name(&self) -> &'static str {
            "Memory"
        }
    }

    fn kathmandu() -> LocationRecord {
        LocationRecord {
            city: CityRecord {
                names: [("en".to_string(), "Kathmandu".to_string())].into(),
            },
            country: CountryRecord {
                iso_code: "NP".to_string(),
                names: [("en".to_string(), "Nepal".to_string())].into(),
            },
            location: TimezoneRecord {
                time_zone: "Asia/Kathmandu".to_string(),
            },
        }
    }

    fn setup() -> (GeoIpDb, Arc<MemorySource>) {
        let mut source = MemorySource::default();
        source
            .records
            .insert("110.44.127.177".parse().unwrap(), kathmandu());
        source
            .records
            .insert("2001:db8::1".parse().unwrap(), kathmandu());
        let source = Arc::new(source);
        (GeoIpDb::from_source(source.clone()), source)
    }

    #[test]
    fn test_get_location_ipv4() {
        let (db, _) = setup();
        let location = db.get_location("110.44.127.177").unwrap();
        assert_eq!(location.city, "Kathmandu");
        assert_eq!(location.country, "Nepal");
        assert_eq!(location.iso_code, "NP");
        assert_eq!(location.timezone, "Asia/Kathmandu");
        assert_eq!(location.ip, "110.44.127.177");
    }

    #[test]
    fn test_get_location_ipv6() {
        let (db, _) = setup();
        let location = db.get_location("2001:db8::1").unwrap();
        assert_eq!(location.iso_code, "NP");
    }

    #[test]
    fn test_invalid_address_skips_lookup() {
        let (db, source) = setup();
        for input in ["not-an-ip", "999.999.1.1", "", " 110.44.127.177", "1.2.3"] {
            let err = db.get_location(input).unwrap_err();
            assert!(
                matches!(err, GeoIpError::InvalidAddress(ref s) if s == input),
                "unexpected error for {:?}: {}",
                input,
                err
            );
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let (db, source) = setup();
        let err = db.get_location("8.8.8.8").unwrap_err();
        match err {
            GeoIpError::LookupFailure { ip, source: cause } => {
                assert_eq!(ip, "8.8.8.8".parse::<IpAddr>().unwrap());
                assert!(matches!(cause, LookupError::NotFound));
            }
            other => panic!("expected lookup failure, got {}", other),
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_call_hits_the_source() {
        let (db, source) = setup();
        db.get_location("110.44.127.177").unwrap();
        db.get_location("110.44.127.177").unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_source_name() {
        let (db, _) = setup();
        assert_eq!(db.source_name(), "Memory");
        assert_eq!(format!("{:?}", db), "GeoIpDb { source: \"Memory\" }");
    }
}
