//! 网关事件分类

use protocol::{
    ClassifiedEvent, DecodeSkip, EVENT_CONNECTION_ESTABLISHED, EVENT_ERROR, EVENT_PING,
    EVENT_PONG, EVENT_SUBSCRIPTION_SUCCEEDED, TYPE_MESSAGE, TYPE_REPLY,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::models::Message;

#[derive(Deserialize)]
struct Established {
    socket_id: String,
    #[serde(default)]
    activity_timeout: Option<u64>,
}

#[derive(Deserialize)]
struct PusherError {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: String,
}

/// 网关事件
///
/// 新增需要处理的事件类型时，在这里加一个变体并在 [`GatewayEvent::classify`]
/// 中映射；其余事件名一律落入 `Unhandled`。
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// 聊天消息（`message` 与 `reply`）
    ChatMessage(Message),
    /// 服务端心跳请求
    Ping,
    /// 服务端心跳响应
    Pong,
    /// 连接建立
    ConnectionEstablished {
        socket_id: String,
        activity_timeout: Option<u64>,
    },
    /// 订阅成功确认
    SubscriptionSucceeded { channel: Option<String> },
    /// 网关报告的错误
    Error { code: Option<u32>, message: String },
    /// 未处理的事件
    Unhandled { name: String },
}

impl GatewayEvent {
    /// 将已解码的事件映射为具体变体
    pub fn classify(event: ClassifiedEvent) -> Result<Self, DecodeSkip> {
        match event.name.as_str() {
            TYPE_MESSAGE | TYPE_REPLY => {
                parse(&event.name, event.data).map(GatewayEvent::ChatMessage)
            }
            EVENT_PING => Ok(GatewayEvent::Ping),
            EVENT_PONG => Ok(GatewayEvent::Pong),
            EVENT_CONNECTION_ESTABLISHED => {
                let established: Established = parse(&event.name, event.data)?;
                Ok(GatewayEvent::ConnectionEstablished {
                    socket_id: established.socket_id,
                    activity_timeout: established.activity_timeout,
                })
            }
            EVENT_SUBSCRIPTION_SUCCEEDED => Ok(GatewayEvent::SubscriptionSucceeded {
                channel: event.channel,
            }),
            EVENT_ERROR => {
                let error: PusherError = parse(&event.name, event.data)?;
                Ok(GatewayEvent::Error {
                    code: error.code,
                    message: error.message,
                })
            }
            _ => Ok(GatewayEvent::Unhandled {
                name: event.name.clone(),
            }),
        }
    }

    /// 事件名，用于日志
    pub fn name(&self) -> &str {
        match self {
            GatewayEvent::ChatMessage(_) => TYPE_MESSAGE,
            GatewayEvent::Ping => EVENT_PING,
            GatewayEvent::Pong => EVENT_PONG,
            GatewayEvent::ConnectionEstablished { .. } => EVENT_CONNECTION_ESTABLISHED,
            GatewayEvent::SubscriptionSucceeded { .. } => EVENT_SUBSCRIPTION_SUCCEEDED,
            GatewayEvent::Error { .. } => EVENT_ERROR,
            GatewayEvent::Unhandled { name } => name,
        }
    }
}

fn parse<T: DeserializeOwned>(name: &str, data: Value) -> Result<T, DecodeSkip> {
    serde_json::from_value(data).map_err(|e| DecodeSkip::UnexpectedShape {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
