//! 消息类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CHANNEL_VERSION, CHATROOM_NAMESPACE};

/// 订阅主题
///
/// 由实体类型与实体 ID 组成，映射为网关上的频道名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    /// 聊天室消息频道
    Chatroom(u64),
}

impl Topic {
    /// 计算规范频道名，例如 `chatrooms.42.v2`
    pub fn channel_name(&self) -> String {
        match self {
            Topic::Chatroom(id) => format!("{CHATROOM_NAMESPACE}.{id}.{CHANNEL_VERSION}"),
        }
    }

    /// 从频道名反向解析主题
    pub fn from_channel_name(name: &str) -> Option<Self> {
        let mut parts = name.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(CHATROOM_NAMESPACE), Some(id), Some(CHANNEL_VERSION), None) => {
                id.parse().ok().map(Topic::Chatroom)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.channel_name())
    }
}

/// 订阅/退订请求体
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    /// 公共频道无需鉴权，固定为空串
    pub auth: String,
    pub channel: String,
}

impl ChannelRequest {
    pub fn new(topic: Topic) -> Self {
        Self {
            auth: String::new(),
            channel: topic.channel_name(),
        }
    }
}

/// 空数据体，序列化为 `{}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyData {}

/// 客户端发送给网关的消息
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    /// 订阅频道
    #[serde(rename = "pusher:subscribe")]
    Subscribe(ChannelRequest),
    /// 退订频道
    #[serde(rename = "pusher:unsubscribe")]
    Unsubscribe(ChannelRequest),
    /// 心跳请求
    #[serde(rename = "pusher:ping")]
    Ping(EmptyData),
    /// 心跳响应
    #[serde(rename = "pusher:pong")]
    Pong(EmptyData),
}

impl ClientMessage {
    pub fn subscribe(topic: Topic) -> Self {
        ClientMessage::Subscribe(ChannelRequest::new(topic))
    }

    pub fn unsubscribe(topic: Topic) -> Self {
        ClientMessage::Unsubscribe(ChannelRequest::new(topic))
    }

    pub fn ping() -> Self {
        ClientMessage::Ping(EmptyData::default())
    }

    pub fn pong() -> Self {
        ClientMessage::Pong(EmptyData::default())
    }
}
