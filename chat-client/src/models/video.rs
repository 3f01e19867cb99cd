//! 回放视频

use serde::{Deserialize, Serialize};

use super::asset::{Asset, ImageSource};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Video {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub session_title: Option<String>,
    #[serde(default)]
    pub is_live: bool,
    /// 时长（毫秒）
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub is_mature: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    thumbnail: Option<ImageSource>,
}

impl Video {
    pub fn thumbnail(&self) -> Option<Asset> {
        self.thumbnail.as_ref().map(Asset::from_source)
    }
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
