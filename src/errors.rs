use std::fmt;
use std::net::IpAddr;

/// 底层数据源查询失败的原因
#[derive(Debug)]
pub enum LookupError {
    /// 数据库中没有该地址的记录
    NotFound,
    /// maxminddb 读取或解码失败（如记录损坏）
    Reader(maxminddb::MaxMindDbError),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound => write!(f, "address not found in database"),
            LookupError::Reader(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::NotFound => None,
            LookupError::Reader(e) => Some(e),
        }
    }
}

impl From<maxminddb::MaxMindDbError> for LookupError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        LookupError::Reader(err)
    }
}

#[derive(Debug)]
pub enum GeoIpError {
    DatabaseOpen {
        path: String,
        source: maxminddb::MaxMindDbError,
    },
    InvalidAddress(String),
    LookupFailure {
        ip: IpAddr,
        source: LookupError,
    },
    Config(String),
    Io(String),
}

impl GeoIpError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoIpError::DatabaseOpen { .. } => "E001",
            GeoIpError::InvalidAddress(_) => "E002",
            GeoIpError::LookupFailure { .. } => "E003",
            GeoIpError::Config(_) => "E004",
            GeoIpError::Io(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoIpError::DatabaseOpen { .. } => "Database Open Error",
            GeoIpError::InvalidAddress(_) => "Invalid Address",
            GeoIpError::LookupFailure { .. } => "Lookup Failure",
            GeoIpError::Config(_) => "Configuration Error",
            GeoIpError::Io(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            GeoIpError::DatabaseOpen { path, source } => {
                format!("unable to load '{}': {}", path, source)
            }
            GeoIpError::InvalidAddress(input) => format!("invalid IP address: '{}'", input),
            GeoIpError::LookupFailure { ip, source } => format!("{}: {}", ip, source),
            GeoIpError::Config(msg) => msg.clone(),
            GeoIpError::Io(msg) => msg.clone(),
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoIpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoIpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoIpError::DatabaseOpen { source, .. } => Some(source),
            GeoIpError::LookupFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

// 便捷的构造函数
impl GeoIpError {
    pub fn invalid_address<T: Into<String>>(input: T) -> Self {
        GeoIpError::InvalidAddress(input.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoIpError::Config(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        GeoIpError::Io(msg.into())
    }
}

impl From<std::io::Error> for GeoIpError {
    fn from(err: std::io::Error) -> Self {
        GeoIpError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for GeoIpError {
    fn from(err: config::ConfigError) -> Self {
        GeoIpError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoIpError>;
