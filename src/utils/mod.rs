pub mod ip;

pub use ip::{ProxyHeaderPolicy, extract_dotted_quad, resolve_client_ip};
