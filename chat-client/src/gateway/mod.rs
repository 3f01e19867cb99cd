//! 实时聊天网关
//!
//! [`Gateway`] 持有一条网关连接，组合订阅管理、事件分发与接收循环。
//! 接收循环只能启动一次，停止后需要重新 [`Gateway::connect`] 并自行重放订阅。

mod dispatcher;
mod event;
mod receive_loop;
mod subscription;

pub use dispatcher::{Dispatcher, HandlerFailure, HandlerId};
pub use event::GatewayEvent;
pub use receive_loop::{LoopState, ReceiveLoop, StopReason};
pub use subscription::SubscriptionManager;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use protocol::{Connection, FrameReader, FrameWriter, MaybeTlsStream, Topic, Transport, WsTransport};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::GatewayConfig;
use crate::error::{ClientError, Result};
use crate::models::Message;

/// 网关客户端
///
/// # Type Parameters
/// * `S` - 底层字节流类型，默认为真实网络连接
pub struct Gateway<S = MaybeTlsStream<TcpStream>> {
    reader: Mutex<Option<FrameReader<S>>>,
    writer: FrameWriter<S>,
    subscriptions: SubscriptionManager<S>,
    dispatcher: Arc<Dispatcher>,
    shutdown_tx: watch::Sender<bool>,
    state: Arc<watch::Sender<LoopState>>,
    heartbeat: Duration,
}

impl Gateway {
    /// 连接网关
    pub async fn connect(config: &GatewayConfig) -> Result<Self> {
        // 重复安装时返回 Err，忽略即可
        let _ = rustls::crypto::ring::default_provider().install_default();

        info!("Connecting to {}", config.url);
        let transport = WsTransport::connect(&config.url, &config.transport).await?;
        info!("Connected to gateway");

        Ok(Self::new(Connection::new(transport), config.heartbeat_interval))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send + 'static> Gateway<S> {
    /// 基于已建立的连接创建网关
    pub fn new(connection: Connection<S>, heartbeat: Duration) -> Self {
        let (reader, writer) = connection.split();
        let (shutdown_tx, _) = watch::channel(false);
        let (state, _) = watch::channel(LoopState::Idle);
        Self {
            reader: Mutex::new(Some(reader)),
            subscriptions: SubscriptionManager::new(writer.clone()),
            writer,
            dispatcher: Arc::new(Dispatcher::new()),
            shutdown_tx,
            state: Arc::new(state),
            heartbeat,
        }
    }

    /// 注册聊天消息处理器
    pub fn on_message<F, Fut>(&self, handler: F) -> HandlerId
    where
        F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.dispatcher.on_message(handler)
    }

    pub fn remove_handler(&self, id: HandlerId) -> bool {
        self.dispatcher.remove_handler(id)
    }

    /// 处理器失败上报通道，只能取一次
    pub fn handler_failures(&self) -> Option<mpsc::Receiver<HandlerFailure>> {
        self.dispatcher.take_failures()
    }

    pub async fn subscribe(&self, topic: Topic) -> Result<bool> {
        self.subscriptions.subscribe(topic).await
    }

    pub async fn unsubscribe(&self, topic: Topic) -> Result<()> {
        self.subscriptions.unsubscribe(topic).await
    }

    pub fn subscriptions(&self) -> &SubscriptionManager<S> {
        &self.subscriptions
    }

    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    /// 订阅循环状态变化
    pub fn watch_state(&self) -> watch::Receiver<LoopState> {
        self.state.subscribe()
    }

    /// 连接是否已不可写
    pub fn is_closed(&self) -> bool {
        self.writer.is_closed()
    }

    /// 在后台任务中启动接收循环
    ///
    /// 不在 tokio 运行时内时返回 [`ClientError::Runtime`]，循环保持可启动；
    /// 第二次调用返回 [`ClientError::AlreadyStarted`]。返回时状态已是 `Running`。
    pub fn start(&self) -> Result<JoinHandle<StopReason>> {
        let runtime = tokio::runtime::Handle::try_current()?;
        let receive_loop = self.take_loop()?;
        self.state.send_replace(LoopState::Running);
        Ok(runtime.spawn(receive_loop.run()))
    }

    /// 在当前任务中运行接收循环直到停止
    pub async fn run(&self) -> Result<StopReason> {
        let receive_loop = self.take_loop()?;
        Ok(receive_loop.run().await)
    }

    /// 请求停止接收循环，重复调用无副作用
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    fn take_loop(&self) -> Result<ReceiveLoop<S>> {
        let reader = self.reader.lock().take().ok_or(ClientError::AlreadyStarted)?;
        Ok(ReceiveLoop::new(
            reader,
            self.writer.clone(),
            Arc::clone(&self.dispatcher),
            self.shutdown_tx.subscribe(),
            Arc::clone(&self.state),
            self.heartbeat,
        ))
    }
}
