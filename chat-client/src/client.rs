//! 客户端上下文
//!
//! 将 REST 协作方与网关组合在一起：数据获取走 [`HttpClient`]，
//! 聊天室的加入/离开走网关订阅。

use std::future::Future;
use std::sync::Arc;

use protocol::MaybeTlsStream;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::{ClientError, Result};
use crate::gateway::{Gateway, HandlerId, StopReason};
use crate::http::HttpClient;
use crate::models::{
    CategorySearchResult, Chatroom, ChatroomRules, Chatter, Emote, Message, User, Video,
    CHANNEL_EMOTE_SET, GLOBAL_EMOTE_SET,
};

/// 聊天客户端
///
/// # Type Parameters
/// * `H` - REST 客户端实现
/// * `S` - 网关底层字节流类型
pub struct Client<H, S = MaybeTlsStream<TcpStream>> {
    http: H,
    gateway: Gateway<S>,
}

impl<H: HttpClient> Client<H> {
    /// 连接网关并创建客户端
    pub async fn connect(http: H, config: &GatewayConfig) -> Result<Self> {
        let gateway = Gateway::connect(config).await?;
        Ok(Self::new(http, gateway))
    }
}

impl<H: HttpClient, S: AsyncRead + AsyncWrite + Unpin + Send + 'static> Client<H, S> {
    pub fn new(http: H, gateway: Gateway<S>) -> Self {
        Self { http, gateway }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    /// 按 slug 获取主播
    pub async fn fetch_user(&self, slug: &str) -> Result<User> {
        debug!("Fetching user {}", slug);
        Ok(self.http.get_user(slug).await?)
    }

    /// 加入聊天室（订阅其网关主题）
    pub async fn join(&self, chatroom: &Chatroom) -> Result<()> {
        self.gateway.subscribe(chatroom.topic()).await?;
        Ok(())
    }

    /// 离开聊天室
    pub async fn leave(&self, chatroom: &Chatroom) -> Result<()> {
        self.gateway.unsubscribe(chatroom.topic()).await
    }

    /// 向聊天室发送消息
    pub async fn send_message(&self, chatroom: &Chatroom, content: &str) -> Result<()> {
        self.http.send_message(chatroom.id, content).await?;
        info!("Sent message to chatroom {}", chatroom.id);
        Ok(())
    }

    /// 获取聊天室内某位观众的资料
    pub async fn fetch_chatter(&self, chatroom: &Chatroom, name: &str) -> Result<Chatter> {
        let streamer = streamer_slug(chatroom)?;
        Ok(self.http.get_chatter(streamer, name).await?)
    }

    /// 获取聊天室规则
    pub async fn fetch_rules(&self, chatroom: &Chatroom) -> Result<ChatroomRules> {
        let streamer = streamer_slug(chatroom)?;
        Ok(self.http.get_chatroom_rules(streamer).await?)
    }

    pub async fn fetch_videos(&self, user: &User) -> Result<Vec<Video>> {
        Ok(self.http.get_streamer_videos(&user.slug).await?)
    }

    /// 获取主播的频道表情，`include_global` 为真时追加全局表情
    pub async fn fetch_emotes(&self, user: &User, include_global: bool) -> Result<Vec<Emote>> {
        let mut sets = self.http.get_emotes(&user.slug).await?;

        let mut emotes = Vec::new();
        if let Some(set) = sets.get_mut(CHANNEL_EMOTE_SET) {
            emotes.append(&mut set.emotes);
        }
        if include_global {
            if let Some(set) = sets.get_mut(GLOBAL_EMOTE_SET) {
                emotes.append(&mut set.emotes);
            }
        }
        Ok(emotes)
    }

    pub async fn search_categories(&self, query: &str) -> Result<CategorySearchResult> {
        Ok(self.http.search_categories(query).await?)
    }

    /// 注册聊天消息处理器
    pub fn on_message<F, Fut>(&self, handler: F) -> HandlerId
    where
        F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.gateway.on_message(handler)
    }

    /// 启动网关接收循环
    pub fn start(&self) -> Result<JoinHandle<StopReason>> {
        self.gateway.start()
    }

    pub fn shutdown(&self) {
        self.gateway.shutdown();
    }
}

fn streamer_slug(chatroom: &Chatroom) -> Result<&str> {
    chatroom
        .streamer()
        .map(|s| s.slug.as_str())
        .ok_or(ClientError::MissingStreamer {
            chatroom_id: chatroom.id,
        })
}
