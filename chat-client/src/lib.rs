//! Kick 直播平台聊天客户端
//!
//! 包含:
//! - 网关连接、订阅与接收循环 (Gateway)
//! - 事件分类与处理器分发 (GatewayEvent, Dispatcher)
//! - 平台数据类型 (models)
//! - REST 协作方抽象 (HttpClient) 与客户端上下文 (Client)

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod models;

mod client;

pub use client::Client;
pub use config::GatewayConfig;
pub use error::{ClientError, Result};
pub use gateway::{
    Dispatcher, Gateway, GatewayEvent, HandlerFailure, HandlerId, LoopState, StopReason,
    SubscriptionManager,
};
pub use http::{HttpClient, HttpError};
pub use protocol::Topic;
