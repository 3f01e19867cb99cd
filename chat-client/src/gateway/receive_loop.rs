//! 接收循环
//!
//! 单一读取任务：收帧 → 解码 → 分类 → 分发，同时负责 Pusher 心跳。
//! 循环结束后连接即作废，不会自动重连。

use std::sync::Arc;
use std::time::Duration;

use protocol::{decode, ClientMessage, FrameReader, FrameWriter, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::event::GatewayEvent;

/// 心跳间隔下限
const MIN_HEARTBEAT: Duration = Duration::from_secs(1);

/// 循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// 尚未启动
    Idle,
    /// 正在接收
    Running,
    /// 已停止（终态）
    Stopped,
}

/// 循环停止原因
#[derive(Debug)]
pub enum StopReason {
    /// 对端关闭连接
    Closed,
    /// 所有者主动取消
    Cancelled,
    /// 不可恢复的传输错误
    Failed(ProtocolError),
}

impl StopReason {
    fn from_write_error(e: ProtocolError) -> Self {
        match e {
            ProtocolError::ConnectionClosed => StopReason::Closed,
            other => StopReason::Failed(other),
        }
    }
}

/// 接收循环
pub struct ReceiveLoop<S> {
    reader: FrameReader<S>,
    writer: FrameWriter<S>,
    dispatcher: Arc<Dispatcher>,
    shutdown_rx: watch::Receiver<bool>,
    state: Arc<watch::Sender<LoopState>>,
    heartbeat: Duration,
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send + 'static> ReceiveLoop<S> {
    pub fn new(
        reader: FrameReader<S>,
        writer: FrameWriter<S>,
        dispatcher: Arc<Dispatcher>,
        shutdown_rx: watch::Receiver<bool>,
        state: Arc<watch::Sender<LoopState>>,
        heartbeat: Duration,
    ) -> Self {
        Self {
            reader,
            writer,
            dispatcher,
            shutdown_rx,
            state,
            heartbeat,
        }
    }

    /// 运行直到连接关闭、出错或被取消
    pub async fn run(self) -> StopReason {
        let ReceiveLoop {
            mut reader,
            writer,
            dispatcher,
            mut shutdown_rx,
            state,
            heartbeat,
        } = self;

        // future 被中途丢弃时同样释放写入端并进入 Stopped
        let _guard = StopGuard {
            writer: writer.clone(),
            state: Arc::clone(&state),
        };

        if *shutdown_rx.borrow() {
            writer.close().await;
            return StopReason::Cancelled;
        }

        state.send_replace(LoopState::Running);
        info!("Receive loop started");

        let mut ticker = interval(heartbeat.max(MIN_HEARTBEAT));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // 跳过第一次立即触发

        let reason = loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    // 发送端被丢弃同样视为取消
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break StopReason::Cancelled;
                    }
                }

                result = reader.recv() => {
                    match result {
                        Ok(raw) => {
                            if let Err(e) = handle_frame(&raw, &writer, &dispatcher).await {
                                warn!("Failed to answer gateway: {}", e);
                                break StopReason::from_write_error(e);
                            }
                        }
                        Err(ProtocolError::ConnectionClosed) => {
                            info!("Gateway closed connection");
                            break StopReason::Closed;
                        }
                        Err(e) => {
                            warn!("Receive error: {}", e);
                            break StopReason::Failed(e);
                        }
                    }
                }

                _ = ticker.tick() => {
                    if let Err(e) = writer.send(&ClientMessage::ping()).await {
                        warn!("Failed to send ping: {}", e);
                        break StopReason::from_write_error(e);
                    }
                    debug!("Sent ping");
                }
            }
        };

        match reason {
            StopReason::Cancelled => writer.close().await,
            // 连接已失效，不再发送关闭帧
            _ => writer.release(),
        }
        info!("Receive loop stopped: {:?}", reason);
        reason
    }
}

/// 处理一帧，只有回写失败才返回错误
async fn handle_frame<S: AsyncRead + AsyncWrite + Unpin>(
    raw: &str,
    writer: &FrameWriter<S>,
    dispatcher: &Dispatcher,
) -> protocol::Result<()> {
    let event = match decode(raw).and_then(GatewayEvent::classify) {
        Ok(event) => event,
        Err(skip) => {
            debug!("Skipping frame: {}", skip);
            return Ok(());
        }
    };

    match event {
        GatewayEvent::Ping => {
            writer.send(&ClientMessage::pong()).await?;
            debug!("Answered ping");
        }
        GatewayEvent::Pong => debug!("Received pong"),
        GatewayEvent::ConnectionEstablished {
            socket_id,
            activity_timeout,
        } => {
            info!(
                "Connection established: socket_id={}, activity_timeout={:?}",
                socket_id, activity_timeout
            );
        }
        GatewayEvent::SubscriptionSucceeded { channel } => {
            info!("Subscription confirmed: {}", channel.as_deref().unwrap_or("<unknown>"));
        }
        GatewayEvent::Error { code, message } => {
            warn!("Gateway error {:?}: {}", code, message);
        }
        GatewayEvent::Unhandled { name } => debug!("Unhandled event {}", name),
        event @ GatewayEvent::ChatMessage(_) => {
            dispatcher.dispatch(event);
        }
    }
    Ok(())
}

struct StopGuard<S> {
    writer: FrameWriter<S>,
    state: Arc<watch::Sender<LoopState>>,
}

impl<S> Drop for StopGuard<S> {
    fn drop(&mut self) {
        self.writer.release();
        self.state.send_replace(LoopState::Stopped);
    }
}
