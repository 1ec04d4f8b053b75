//! 客户端 IP 提取工具
//!
//! 按固定优先级检查代理相关请求头，取第一个 IPv4 点分地址；
//! 不信任代理头或没有匹配时使用连接地址。
//!
//! 结果仅供参考：请求头可被客户端伪造，只有确认前面是可信反向代理时才应开启
//! `trust_proxy_headers`。只识别 IPv4，纯 IPv6 的值会得到空字符串。

use actix_web::HttpRequest;
use actix_web::dev::ServiceRequest;
use actix_web::http::header::HeaderMap;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// 连接地址缺失时使用的占位地址
pub const UNSPECIFIED_IP: &str = "0.0.0.0";

/// 默认的代理请求头优先级
pub const DEFAULT_PROXY_HEADERS: [&str; 9] = [
    "X-Original-Forwarded-For",
    "X-Forwarded-For",
    "X-Real-Ip",
    "X-Client-Ip",
    "Forwarded-For",
    "Forwarded",
    "Remote-Addr",
    "Client-Ip",
    "CF-Connecting-IP",
];

/// 值长度不超过该值的请求头/连接地址视为空
const MIN_CANDIDATE_LEN: usize = 3;

static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}")
        .expect("dotted-quad pattern is valid")
});

/// 代理请求头信任策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyHeaderPolicy {
    #[serde(default)]
    pub trust_proxy_headers: bool,
    #[serde(default = "default_proxy_headers")]
    pub headers: Vec<String>,
}

fn default_proxy_headers() -> Vec<String> {
    DEFAULT_PROXY_HEADERS.iter().map(|h| h.to_string()).collect()
}

impl Default for ProxyHeaderPolicy {
    fn default() -> Self {
        Self {
            trust_proxy_headers: false,
            headers: default_proxy_headers(),
        }
    }
}

impl ProxyHeaderPolicy {
    /// 信任默认代理请求头的策略
    pub fn trusted() -> Self {
        Self {
            trust_proxy_headers: true,
            ..Self::default()
        }
    }
}

/// 在字节串中查找第一个（最左侧）IPv4 点分地址
///
/// 不校验每段是否在 0-255 之间。
pub fn extract_dotted_quad(value: &[u8]) -> Option<&str> {
    DOTTED_QUAD
        .find(value)
        .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
}

/// 确定客户端 IP
///
/// 1. 信任代理头时，按 `policy.headers` 顺序找第一个值长度超过 3 的请求头，
///    直接返回其中的点分地址（找不到则为空字符串）
/// 2. 否则使用连接地址；长度不超过 3 时用 `0.0.0.0` 代替
pub fn resolve_client_ip(
    headers: &HeaderMap,
    policy: &ProxyHeaderPolicy,
    connection_addr: &str,
) -> String {
    if policy.trust_proxy_headers {
        for name in &policy.headers {
            let Some(value) = headers.get(name.as_str()) else {
                continue;
            };
            if value.len() > MIN_CANDIDATE_LEN {
                let ip = extract_dotted_quad(value.as_bytes()).unwrap_or_default();
                trace!("Client IP from header {}: {:?}", name, ip);
                return ip.to_string();
            }
        }
    }

    let candidate = if connection_addr.len() <= MIN_CANDIDATE_LEN {
        UNSPECIFIED_IP
    } else {
        connection_addr
    };

    extract_dotted_quad(candidate.as_bytes())
        .unwrap_or_default()
        .to_string()
}

/// 从 HttpRequest 提取客户端 IP
pub fn client_ip_from_request(req: &HttpRequest, policy: &ProxyHeaderPolicy) -> String {
    let peer = req.peer_addr().map(|a| a.ip().to_string()).unwrap_or_default();
    resolve_client_ip(req.headers(), policy, &peer)
}

/// 从 ServiceRequest 提取客户端 IP（中间件使用）
pub fn client_ip_from_service_request(req: &ServiceRequest, policy: &ProxyHeaderPolicy) -> String {
    client_ip_from_request(req.request(), policy)
}
