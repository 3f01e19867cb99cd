//! 事件分发
//!
//! 处理器按注册顺序被依次调用（调用顺序与帧到达顺序一致），
//! 返回的 future 各自在独立任务中执行，接收循环不等待其完成。
//! 处理器的错误或 panic 通过 [`HandlerFailure`] 上报，不影响后续分发。

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::event::GatewayEvent;
use crate::models::Message;

/// 失败上报通道容量，满时丢弃并仅记录日志
const FAILURE_BUFFER: usize = 64;

type MessageHandler = Arc<dyn Fn(Arc<Message>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// 处理器标识，用于注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// 处理器执行失败
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: HandlerId,
    pub event: &'static str,
    pub error: anyhow::Error,
}

/// 事件分发器
pub struct Dispatcher {
    handlers: RwLock<Vec<(HandlerId, MessageHandler)>>,
    next_id: AtomicU64,
    failures_tx: mpsc::Sender<HandlerFailure>,
    failures_rx: Mutex<Option<mpsc::Receiver<HandlerFailure>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (failures_tx, failures_rx) = mpsc::channel(FAILURE_BUFFER);
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            failures_tx,
            failures_rx: Mutex::new(Some(failures_rx)),
        }
    }

    /// 注册聊天消息处理器
    pub fn on_message<F, Fut>(&self, handler: F) -> HandlerId
    where
        F: Fn(Arc<Message>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: MessageHandler = Arc::new(move |msg| handler(msg).boxed());
        self.handlers.write().push((id, handler));
        debug!("Registered message handler {:?}", id);
        id
    }

    /// 注销处理器，返回是否存在
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// 取走失败上报接收端（只能取一次）
    pub fn take_failures(&self) -> Option<mpsc::Receiver<HandlerFailure>> {
        self.failures_rx.lock().take()
    }

    /// 分发一个事件，返回被调用的处理器数量
    ///
    /// 必须在 tokio 运行时内调用。
    pub fn dispatch(&self, event: GatewayEvent) -> usize {
        match event {
            GatewayEvent::ChatMessage(message) => self.dispatch_message(Arc::new(message)),
            other => {
                debug!("No handlers for event {}", other.name());
                0
            }
        }
    }

    fn dispatch_message(&self, message: Arc<Message>) -> usize {
        // 快照后释放锁，处理器内部可以安全地注册/注销
        let handlers = self.handlers.read().clone();

        for (id, handler) in &handlers {
            let id = *id;
            let future = match panic::catch_unwind(AssertUnwindSafe(|| handler(Arc::clone(&message)))) {
                Ok(future) => future,
                Err(payload) => {
                    report(
                        &self.failures_tx,
                        HandlerFailure {
                            handler: id,
                            event: "message",
                            error: anyhow!("handler panicked: {}", panic_message(payload.as_ref())),
                        },
                    );
                    continue;
                }
            };

            let failures_tx = self.failures_tx.clone();
            tokio::spawn(async move {
                let error = match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(())) => return,
                    Ok(Err(e)) => e,
                    Err(payload) => anyhow!("handler panicked: {}", panic_message(payload.as_ref())),
                };
                report(
                    &failures_tx,
                    HandlerFailure {
                        handler: id,
                        event: "message",
                        error,
                    },
                );
            });
        }

        handlers.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn report(failures_tx: &mpsc::Sender<HandlerFailure>, failure: HandlerFailure) {
    error!(
        "Handler {:?} failed on {}: {:#}",
        failure.handler, failure.event, failure.error
    );
    if let Err(mpsc::error::TrySendError::Full(_)) = failures_tx.try_send(failure) {
        warn!("Handler failure buffer full, dropping report");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
