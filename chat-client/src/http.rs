//! REST 接口抽象
//!
//! 具体的 HTTP 实现（鉴权、限流、分页）由使用方提供，
//! 这里只约定客户端需要的请求集合。

use std::future::Future;

use thiserror::Error;

use crate::models::{CategorySearchResult, Chatter, ChatroomRules, EmoteSet, User, Video};

/// REST 请求错误
#[derive(Error, Debug)]
pub enum HttpError {
    /// 非成功状态码
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// 请求未能完成
    #[error("Request error: {0}")]
    Request(String),

    /// 响应体解析失败
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// REST 客户端 trait
pub trait HttpClient: Send + Sync + 'static {
    /// 按 slug 获取主播
    fn get_user(&self, slug: &str) -> impl Future<Output = Result<User, HttpError>> + Send;

    /// 获取聊天室规则
    fn get_chatroom_rules(
        &self,
        streamer: &str,
    ) -> impl Future<Output = Result<ChatroomRules, HttpError>> + Send;

    /// 获取聊天室内某位观众的资料
    fn get_chatter(
        &self,
        streamer: &str,
        chatter: &str,
    ) -> impl Future<Output = Result<Chatter, HttpError>> + Send;

    /// 获取主播的回放列表
    fn get_streamer_videos(
        &self,
        streamer: &str,
    ) -> impl Future<Output = Result<Vec<Video>, HttpError>> + Send;

    /// 获取表情集合列表
    fn get_emotes(
        &self,
        streamer: &str,
    ) -> impl Future<Output = Result<Vec<EmoteSet>, HttpError>> + Send;

    /// 搜索分类
    fn search_categories(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<CategorySearchResult, HttpError>> + Send;

    /// 向聊天室发送消息
    fn send_message(
        &self,
        chatroom_id: u64,
        content: &str,
    ) -> impl Future<Output = Result<(), HttpError>> + Send;
}
