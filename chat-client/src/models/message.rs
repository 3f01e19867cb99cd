//! 聊天消息
//!
//! 由网关推送的内层文档直接构造，不需要额外的网络请求。
//! 除 `type` 与 `content` 外的字段均为可选。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 消息类型
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// 普通消息
    Message,
    /// 回复他人的消息
    Reply,
}

/// 徽章
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub count: Option<u32>,
}

/// 发送者外观
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

/// 消息发送者
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub username: String,
    pub slug: String,
    #[serde(default)]
    pub identity: Identity,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OriginalSender {
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OriginalMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
}

/// 回复消息附带的被回复内容
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyMetadata {
    #[serde(default)]
    pub original_sender: Option<OriginalSender>,
    #[serde(default)]
    pub original_message: Option<OriginalMessage>,
}

/// 聊天消息
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub chatroom_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub metadata: Option<ReplyMetadata>,
}

impl Message {
    pub fn is_reply(&self) -> bool {
        self.kind == MessageKind::Reply
    }

    /// 发送者用户名
    pub fn author(&self) -> Option<&str> {
        self.sender.as_ref().map(|s| s.username.as_str())
    }
}
