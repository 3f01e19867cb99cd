//! 主播（频道）信息

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::{Asset, ImageSource};
use super::category::Category;
use super::chatroom::{Chatroom, StreamerRef};

/// 社交平台账号
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Socials {
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

/// 账号资料（接口中的 `user` 子对象）
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "profile_pic", default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub agreed_to_terms: bool,
    #[serde(default)]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub socials: Socials,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BannerImage {
    pub url: String,
}

/// 订阅徽章
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriberBadge {
    pub id: u64,
    pub months: u32,
    #[serde(default)]
    pub badge_image: Option<ImageSource>,
}

/// 正在进行的直播
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Livestream {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub session_title: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_mature: bool,
    /// 平台返回的原始时间字符串（非 RFC 3339）
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 主播
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub vod_enabled: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub subscription_enabled: bool,
    #[serde(rename = "followers_count", default)]
    pub follower_count: u64,
    #[serde(default)]
    pub subscriber_badges: Vec<SubscriberBadge>,
    #[serde(default)]
    banner_image: Option<BannerImage>,
    #[serde(default)]
    offline_banner_image: Option<ImageSource>,
    #[serde(rename = "muted", default)]
    pub is_muted: bool,
    #[serde(rename = "verified", default)]
    pub is_verified: bool,
    #[serde(default)]
    pub can_host: bool,
    #[serde(rename = "user")]
    pub profile: UserProfile,
    #[serde(default)]
    pub livestream: Option<Livestream>,
    chatroom: Chatroom,
    #[serde(default)]
    pub recent_categories: Vec<Category>,
}

impl User {
    pub fn username(&self) -> &str {
        &self.profile.username
    }

    /// 直播中横幅
    pub fn online_banner(&self) -> Option<Asset> {
        self.banner_image.as_ref().map(|b| Asset::new(b.url.clone()))
    }

    /// 离线横幅
    pub fn offline_banner(&self) -> Option<Asset> {
        self.offline_banner_image.as_ref().map(Asset::from_source)
    }

    /// 该主播的聊天室，已附带指回主播的引用
    pub fn chatroom(&self) -> Chatroom {
        let mut chatroom = self.chatroom.clone();
        chatroom.attach_streamer(self.streamer_ref());
        chatroom
    }

    pub fn streamer_ref(&self) -> StreamerRef {
        StreamerRef {
            id: self.id,
            slug: self.slug.clone(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
