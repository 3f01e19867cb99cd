//! 传输层抽象
//!
//! 提供 Transport trait 使上层协议与具体的 WebSocket 建连方式解耦，
//! 测试中可以直接用内存双工流替代真实网络。

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::{CONNECT_TIMEOUT, MAX_FRAME_SIZE};

/// 传输层配置
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// 连接超时时间
    pub connect_timeout: Duration,
    /// 是否禁用 Nagle 算法（TCP nodelay）
    pub nodelay: bool,
    /// 单帧最大字节数
    pub max_frame_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            nodelay: true,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

impl TransportConfig {
    fn websocket_config(&self) -> WebSocketConfig {
        let mut config = WebSocketConfig::default();
        config.max_frame_size = Some(self.max_frame_size);
        config.max_message_size = Some(self.max_frame_size);
        config
    }
}

/// 传输层抽象 trait
///
/// 负责建立一条已完成握手的 WebSocket 流。
pub trait Transport: Send + Sized {
    /// 底层字节流类型
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// 建立连接
    ///
    /// # Arguments
    /// * `url` - 网关地址，`ws://` 或 `wss://`
    /// * `config` - 传输配置
    fn connect(
        url: &str,
        config: &TransportConfig,
    ) -> impl Future<Output = Result<Self>> + Send;

    /// 取出握手完成的 WebSocket 流
    fn into_stream(self) -> WebSocketStream<Self::Io>;
}

// ============================================================================
// WebSocket 实现
// ============================================================================

/// 基于 TCP（可选 TLS）的 WebSocket 传输
#[derive(Debug)]
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Transport for WsTransport {
    type Io = MaybeTlsStream<TcpStream>;

    async fn connect(url: &str, config: &TransportConfig) -> Result<Self> {
        // 带超时的连接与握手
        let (stream, response) = timeout(
            config.connect_timeout,
            connect_async_with_config(url, Some(config.websocket_config()), config.nodelay),
        )
        .await
        .map_err(|_| ProtocolError::ConnectionTimeout)??;

        debug!("WebSocket handshake complete, status: {}", response.status());
        Ok(Self { stream })
    }

    fn into_stream(self) -> WebSocketStream<Self::Io> {
        self.stream
    }
}
