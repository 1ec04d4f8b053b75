//! GeoIP database tests
//!
//! Most tests run against `tests/data/ipgeo-city-test.mmdb`, a small
//! City-format database rebuilt by `tests/data/generate_city_fixture.py`.
//!
//! The check against a full GeoLite2-City database needs the file path in
//! `IPGEO_TEST_DB` and is ignored by default:
//!
//! ```text
//! IPGEO_TEST_DB=./assets/geoip/GeoLite2-City.mmdb cargo test -- --ignored
//! ```

use std::net::IpAddr;

use ipgeo::errors::{GeoIpError, LookupError};
use ipgeo::services::GeoIpDb;
use ipgeo::services::geoip::{LocationSource, MaxMindReader};

const FIXTURE_DB: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/ipgeo-city-test.mmdb");

fn fixture_db() -> GeoIpDb {
    GeoIpDb::open(FIXTURE_DB).expect("Failed to open fixture database")
}

fn assert_not_found(db: &GeoIpDb, ip: &str) {
    match db.get_location(ip) {
        Err(GeoIpError::LookupFailure { ip: failed, source }) => {
            assert_eq!(failed.to_string(), ip);
            assert!(matches!(source, LookupError::NotFound));
        }
        other => panic!("expected lookup failure for {}, got {:?}", ip, other),
    }
}

#[test]
fn test_open_missing_database_returns_error() {
    let err = GeoIpDb::open("./does-not-exist/GeoLite2-City.mmdb").unwrap_err();
    assert!(matches!(err, GeoIpError::DatabaseOpen { .. }));
    assert!(err.to_string().contains("GeoLite2-City.mmdb"));
}

#[test]
fn test_known_address_fixture() {
    let db = fixture_db();
    let location = db.get_location("110.44.127.177").unwrap();

    assert_eq!(location.ip, "110.44.127.177");
    assert_eq!(location.iso_code, "NP");
    assert_eq!(location.country, "Nepal");
    assert_eq!(location.city, "Kathmandu");
    assert_eq!(location.timezone, "Asia/Kathmandu");
}

#[test]
fn test_non_ascii_city_name() {
    let location = fixture_db().get_location("89.160.20.130").unwrap();
    assert_eq!(location.city, "Linköping");
    assert_eq!(location.country, "Sweden");
    assert_eq!(location.iso_code, "SE");
    assert_eq!(location.timezone, "Europe/Stockholm");
}

#[test]
fn test_network_boundaries() {
    let db = fixture_db();
    assert_eq!(db.get_location("81.2.69.160").unwrap().city, "London");
    assert_eq!(db.get_location("81.2.69.191").unwrap().city, "London");
    assert_not_found(&db, "81.2.69.192");
    assert_not_found(&db, "110.44.128.1");
}

#[test]
fn test_missing_english_country_name_is_empty() {
    let location = fixture_db().get_location("202.196.224.5").unwrap();
    assert_eq!(location.country, "");
    assert_eq!(location.city, "");
    assert_eq!(location.iso_code, "PH");
    assert_eq!(location.timezone, "Asia/Manila");
}

#[test]
fn test_ipv6_lookup() {
    let db = fixture_db();
    let location = db.get_location("2001:218::1").unwrap();
    assert_eq!(location.ip, "2001:218::1");
    assert_eq!(location.iso_code, "JP");
    assert_eq!(location.country, "Japan");
    assert_eq!(location.city, "");
    assert_eq!(location.timezone, "Asia/Tokyo");

    let json = serde_json::to_value(&location).unwrap();
    assert!(json.get("city").is_none());
}

#[test]
fn test_ipv4_compatible_ipv6_address_reaches_ipv4_data() {
    let location = fixture_db().get_location("::110.44.127.177").unwrap();
    assert_eq!(location.iso_code, "NP");
}

#[test]
fn test_private_address_is_not_found() {
    let db = fixture_db();
    assert_not_found(&db, "10.0.0.1");
    assert_not_found(&db, "1.1.1.1");
    assert_not_found(&db, "::1");
}

#[test]
fn test_reader_reports_missing_record() {
    let reader = MaxMindReader::open(FIXTURE_DB).unwrap();
    let ip: IpAddr = "192.0.2.1".parse().unwrap();
    assert!(matches!(reader.lookup(ip), Err(LookupError::NotFound)));

    let ip: IpAddr = "110.44.127.1".parse().unwrap();
    let record = reader.lookup(ip).unwrap();
    assert_eq!(record.country.iso_code, "NP");
    assert_eq!(record.city.names.get("de").map(String::as_str), Some("Kathmandu"));
}

#[test]
fn test_invalid_addresses_skip_lookup() {
    let db = fixture_db();
    for input in ["not-an-ip", "999.999.1.1", " 110.44.127.177", ""] {
        assert!(matches!(
            db.get_location(input),
            Err(GeoIpError::InvalidAddress(_))
        ));
    }
}

#[test]
#[ignore]
fn test_known_address_against_full_database() {
    let path = std::env::var("IPGEO_TEST_DB").expect("IPGEO_TEST_DB must point to a City database");
    let db = GeoIpDb::open(&path).expect("Failed to open test database");
    let location = db.get_location("110.44.127.177").unwrap();

    assert_eq!(location.iso_code, "NP");
    assert_eq!(location.country, "Nepal");
    assert_eq!(location.city, "Kathmandu");
    assert_eq!(location.timezone, "Asia/Kathmandu");
}
