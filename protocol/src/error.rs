//! 错误类型定义

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket 错误
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,
}

impl From<tungstenite::Error> for ProtocolError {
    fn from(e: tungstenite::Error) -> Self {
        // 只有完成关闭握手才算正常关闭，对端重置属于传输错误
        match e {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                ProtocolError::ConnectionClosed
            }
            tungstenite::Error::Io(e) => ProtocolError::Io(e),
            other => ProtocolError::WebSocket(Box::new(other)),
        }
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_variants_map_to_connection_closed() {
        let err: ProtocolError = tungstenite::Error::ConnectionClosed.into();
        assert!(matches!(err, ProtocolError::ConnectionClosed));

        let err: ProtocolError = tungstenite::Error::AlreadyClosed.into();
        assert!(matches!(err, ProtocolError::ConnectionClosed));
    }

    #[test]
    fn test_reset_without_close_is_transport_error() {
        use tungstenite::error::ProtocolError as WsProtocolError;

        let err: ProtocolError =
            tungstenite::Error::Protocol(WsProtocolError::ResetWithoutClosingHandshake).into();
        assert!(matches!(err, ProtocolError::WebSocket(_)));
    }

    #[test]
    fn test_io_error_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ProtocolError = tungstenite::Error::Io(io).into();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
