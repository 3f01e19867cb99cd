//! 错误类型定义

use protocol::ProtocolError;
use thiserror::Error;

use crate::http::HttpError;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    /// 网关协议或连接错误
    #[error("Gateway error: {0}")]
    Protocol(#[from] ProtocolError),

    /// REST 请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// 接收循环只能启动一次
    #[error("Receive loop already started")]
    AlreadyStarted,

    /// 当前线程不在 tokio 运行时内
    #[error("No tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// 聊天室缺少所属主播信息
    #[error("Chatroom {chatroom_id} has no streamer attached")]
    MissingStreamer { chatroom_id: u64 },
}

impl ClientError {
    /// 是否为连接已关闭导致的失败（调用方需重新连接）
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, ClientError::Protocol(ProtocolError::ConnectionClosed))
    }
}

/// 客户端操作结果类型
pub type Result<T> = std::result::Result<T, ClientError>;
