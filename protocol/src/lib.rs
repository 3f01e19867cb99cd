//! Kick 实时聊天网关共享协议库
//!
//! 包含:
//! - 出站消息与订阅主题 (ClientMessage, Topic)
//! - 传输层抽象 (Transport trait)
//! - 两阶段帧解码 (decode / ClassifiedEvent)
//! - 连接封装 (Connection, FrameReader, FrameWriter)

mod message;
mod constants;
mod transport;
mod codec;
mod connection;
mod error;

pub use message::{ChannelRequest, ClientMessage, EmptyData, Topic};
pub use constants::*;
pub use transport::{Transport, TransportConfig, WsTransport};
pub use codec::{decode, encode, ClassifiedEvent, DecodeSkip};
pub use connection::{Connection, FrameReader, FrameWriter};
pub use error::{ProtocolError, Result};

/// 测试与嵌入场景下使用的 WebSocket 类型
pub use tokio_tungstenite::{tungstenite, MaybeTlsStream, WebSocketStream};
