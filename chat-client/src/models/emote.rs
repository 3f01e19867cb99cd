//! 表情

use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// 表情图片 CDN 前缀
const EMOTE_CDN: &str = "https://files.kick.com/emotes";

/// 表情集合在接口返回列表中的位置
pub const GLOBAL_EMOTE_SET: usize = 1;
pub const CHANNEL_EMOTE_SET: usize = 2;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Emote {
    pub id: u64,
    #[serde(default)]
    pub channel_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub subscribers_only: bool,
}

impl Emote {
    pub fn source(&self) -> Asset {
        Asset::new(format!("{EMOTE_CDN}/{}/fullsize", self.id))
    }
}

impl PartialEq for Emote {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// 一组表情
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EmoteSet {
    #[serde(default)]
    pub emotes: Vec<Emote>,
}
