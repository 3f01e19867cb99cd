//! 分类与分类搜索结果

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// 顶级分类（如 Games、IRL）
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ParentCategory {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub icon: Asset,
}

impl PartialEq for ParentCategory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// 子分类（具体游戏或栏目）
///
/// 平台同时返回 `id` 与 `category_id` 两个标识，二者的区别没有文档说明，
/// 这里原样保留，不做任何推断或合并。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: u64,
    pub category_id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 所属顶级分类
    #[serde(rename = "category")]
    pub parent: ParentCategory,
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// 搜索索引中的分类文档
///
/// 注意这里的 `id` 是字符串形式的子分类 ID，`category_id` 是顶级分类 ID。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchCategory {
    pub category_id: u64,
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub is_live: bool,
    pub is_mature: bool,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub srcset: String,
    /// 顶级分类名称
    pub parent: String,
}

/// 字段级高亮
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextHighlight {
    pub matched_tokens: Vec<String>,
    pub snippet: String,
}

/// 带字段名的高亮
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchHighlight {
    pub field: String,
    pub matched_tokens: Vec<String>,
    pub snippet: String,
}

/// 匹配打分详情
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextMatchInfo {
    pub best_field_score: String,
    pub best_field_weight: i64,
    pub fields_matched: u32,
    pub num_tokens_dropped: u32,
    pub score: String,
    pub tokens_matched: u32,
    pub typo_prefix_score: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategorySearchHit {
    pub document: SearchCategory,
    #[serde(default)]
    pub highlight: HashMap<String, TextHighlight>,
    #[serde(default)]
    pub highlights: Vec<SearchHighlight>,
    pub text_match: u64,
    pub text_match_info: TextMatchInfo,
}

/// 分类搜索响应
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategorySearchResult {
    pub found: u64,
    pub page: u32,
    #[serde(default)]
    pub hits: Vec<CategorySearchHit>,
}
