//! 网关配置

use std::str::FromStr;
use std::time::Duration;

use protocol::{TransportConfig, DEFAULT_GATEWAY_URL, HEARTBEAT_INTERVAL};
use tracing::warn;

/// 网关地址环境变量
pub const ENV_GATEWAY_URL: &str = "KICK_GATEWAY_URL";
/// 连接超时环境变量（秒）
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "KICK_CONNECT_TIMEOUT_SECS";
/// 心跳间隔环境变量（秒）
pub const ENV_HEARTBEAT_INTERVAL_SECS: &str = "KICK_HEARTBEAT_INTERVAL_SECS";

/// 网关配置
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// 网关 WebSocket 地址
    pub url: String,
    /// 传输层配置
    pub transport: TransportConfig,
    /// 客户端主动发送 `pusher:ping` 的间隔
    pub heartbeat_interval: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            transport: TransportConfig::default(),
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }
}

impl GatewayConfig {
    /// 从环境变量读取配置，缺失或非法的值使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_GATEWAY_URL).filter(|u| !u.trim().is_empty()) {
            config.url = url;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_CONNECT_TIMEOUT_SECS) {
            config.transport.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_HEARTBEAT_INTERVAL_SECS).filter(|s| *s > 0) {
            config.heartbeat_interval = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}
