//! GeoIP 记录与响应结构
//!
//! `LocationRecord` 对应数据库中的嵌套记录，`Location` 是对外返回的扁平结构。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 响应中使用的语言代码
pub const DISPLAY_LANGUAGE: &str = "en";

/// 数据库中解码出的原始记录（GeoIP2 City 结构的子集）
///
/// 所有字段在数据库里都是可选的，缺失时解码为空值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub city: CityRecord,
    #[serde(default)]
    pub country: CountryRecord,
    #[serde(default)]
    pub location: TimezoneRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CityRecord {
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub iso_code: String,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimezoneRecord {
    #[serde(default)]
    pub time_zone: String,
}

/// 查询结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    pub ip: String,
    pub country: String,
    pub iso_code: String,
    pub timezone: String,
}

impl Location {
    /// 将数据库记录整形为扁平响应
    ///
    /// `country`/`city` 只取英文名称，缺失时为空字符串；
    /// `iso_code` 与 `timezone` 原样复制。
    pub fn from_record(ip: &str, record: LocationRecord) -> Self {
        let LocationRecord {
            mut city,
            mut country,
            location,
        } = record;

        Self {
            city: city.names.remove(DISPLAY_LANGUAGE).unwrap_or_default(),
            ip: ip.to_string(),
            country: country.names.remove(DISPLAY_LANGUAGE).unwrap_or_default(),
            iso_code: country.iso_code,
            timezone: location.time_zone,
        }
    }
}
