//! 聊天室内的观众资料

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Badge;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Chatter {
    pub id: u64,
    pub username: String,
    pub slug: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default, alias = "is_staf")]
    pub is_staff: bool,
    #[serde(default)]
    pub is_channel_owner: bool,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub following_since: Option<DateTime<Utc>>,
    /// 已订阅月数
    #[serde(default)]
    pub subscribed_for: u32,
}

impl PartialEq for Chatter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chatter_deserialize() {
        let chatter: Chatter = serde_json::from_str(
            r#"{
                "id": 99, "username": "Viewer", "slug": "viewer", "profile_pic": null,
                "is_staff": false, "is_channel_owner": false, "is_moderator": true,
                "badges": [{"type": "moderator", "text": "Moderator", "active": true}],
                "following_since": "2023-01-02T03:04:05.000000Z",
                "subscribed_for": 3,
                "banned": null
            }"#,
        )
        .unwrap();
        assert_eq!(chatter.slug, "viewer");
        assert!(chatter.is_moderator);
        assert_eq!(chatter.badges[0].kind, "moderator");
        assert!(chatter.following_since.is_some());
        assert_eq!(chatter.subscribed_for, 3);
    }
}
