//! 静态资源

use serde::{Deserialize, Serialize};

/// 图片等静态资源的地址
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Asset {
    pub url: String,
}

impl Asset {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// 从 `src`/`srcset` 结构中取主地址
    pub fn from_source(source: &ImageSource) -> Self {
        Self::new(source.src.clone())
    }
}

/// 带响应式地址的图片
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub src: String,
    #[serde(default)]
    pub srcset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_is_plain_string() {
        let asset: Asset = serde_json::from_str(r#""https://files.kick.com/a.png""#).unwrap();
        assert_eq!(asset.url, "https://files.kick.com/a.png");
    }

    #[test]
    fn test_asset_from_source() {
        let source: ImageSource =
            serde_json::from_str(r#"{"src": "https://x/1.webp", "srcset": "https://x/1.webp 1x"}"#)
                .unwrap();
        assert_eq!(Asset::from_source(&source).url, "https://x/1.webp");
    }
}
