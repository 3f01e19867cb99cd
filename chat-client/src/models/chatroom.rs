//! 聊天室

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use protocol::Topic;

/// 聊天模式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Public,
    Privileged,
    #[serde(other)]
    Other,
}

/// 聊天室所属主播的轻量引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamerRef {
    pub id: u64,
    pub slug: String,
}

/// 聊天室
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Chatroom {
    pub id: u64,
    pub chatable_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub chat_mode: ChatMode,
    #[serde(rename = "slow_mode")]
    pub slowmode: bool,
    pub followers_mode: bool,
    pub subscribers_mode: bool,
    pub emotes_mode: bool,
    /// 慢速模式下的发言间隔（秒）
    pub message_interval: u32,
    /// 关注者模式下要求的最短关注时长（分钟）
    pub following_min_duration: u32,
    /// 由所属 User 在构造时设置一次
    #[serde(skip)]
    streamer: Option<StreamerRef>,
}

impl Chatroom {
    /// 所属主播（仅通过 User 获得的聊天室才有）
    pub fn streamer(&self) -> Option<&StreamerRef> {
        self.streamer.as_ref()
    }

    /// 设置所属主播，已设置时保持不变
    pub(crate) fn attach_streamer(&mut self, streamer: StreamerRef) {
        if self.streamer.is_none() {
            self.streamer = Some(streamer);
        }
    }

    /// 对应的网关订阅主题
    pub fn topic(&self) -> Topic {
        Topic::Chatroom(self.id)
    }
}

impl PartialEq for Chatroom {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// 聊天室规则
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatroomRules {
    pub rules: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn chatroom_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "chatable_type": "App\\Models\\Channel",
            "channel_id": 7,
            "created_at": "2022-10-14T19:17:01.000000Z",
            "updated_at": "2023-06-01T08:00:00.000000Z",
            "chat_mode_old": "public",
            "chat_mode": "public",
            "slow_mode": false,
            "chatable_id": 7,
            "followers_mode": true,
            "subscribers_mode": false,
            "emotes_mode": false,
            "message_interval": 6,
            "following_min_duration": 10
        })
    }

    #[test]
    fn test_chatroom_deserialize() {
        let chatroom: Chatroom = serde_json::from_value(chatroom_json(42)).unwrap();
        assert_eq!(chatroom.id, 42);
        assert_eq!(chatroom.chat_mode, ChatMode::Public);
        assert!(chatroom.followers_mode);
        assert_eq!(chatroom.message_interval, 6);
        assert!(chatroom.streamer().is_none());
        assert_eq!(chatroom.topic(), Topic::Chatroom(42));
    }

    #[test]
    fn test_unknown_chat_mode() {
        let mut value = chatroom_json(1);
        value["chat_mode"] = json!("subscribers_only_v3");
        let chatroom: Chatroom = serde_json::from_value(value).unwrap();
        assert_eq!(chatroom.chat_mode, ChatMode::Other);
    }

    #[test]
    fn test_streamer_is_set_once() {
        let mut chatroom: Chatroom = serde_json::from_value(chatroom_json(1)).unwrap();
        chatroom.attach_streamer(StreamerRef { id: 1, slug: "first".to_string() });
        chatroom.attach_streamer(StreamerRef { id: 2, slug: "second".to_string() });
        assert_eq!(chatroom.streamer().unwrap().slug, "first");
    }
}
