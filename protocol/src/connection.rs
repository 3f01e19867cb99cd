//! 连接封装
//!
//! 将 WebSocket 流拆分为单一读取端与可共享的写入端。
//! 读取端只允许一个任务持有；写入端可克隆，内部互斥保证帧不会交错写入。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, warn};

use crate::codec::encode;
use crate::error::{ProtocolError, Result};
use crate::message::ClientMessage;
use crate::transport::Transport;

/// 连接封装
///
/// # Type Parameters
/// * `S` - 底层字节流类型
pub struct Connection<S> {
    stream: WebSocketStream<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send + 'static> Connection<S> {
    /// 从传输层创建连接
    pub fn new<T: Transport<Io = S>>(transport: T) -> Self {
        Self {
            stream: transport.into_stream(),
        }
    }

    /// 从已握手的流直接创建连接
    pub fn from_stream(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }

    /// 分离为读取端和写入端
    pub fn split(self) -> (FrameReader<S>, FrameWriter<S>) {
        let (sink, stream) = self.stream.split();
        (
            FrameReader { stream },
            FrameWriter {
                inner: Arc::new(WriterInner {
                    sink: Mutex::new(Some(sink)),
                    closed: AtomicBool::new(false),
                }),
            },
        )
    }
}

/// 帧读取器
pub struct FrameReader<S> {
    stream: SplitStream<WebSocketStream<S>>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> FrameReader<S> {
    /// 接收下一帧原始文本
    ///
    /// 控制帧（ping/pong）在此层被吸收；对端关闭时返回
    /// [`ProtocolError::ConnectionClosed`]。
    pub async fn recv(&mut self) -> Result<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Ok(text),
                    Err(e) => {
                        warn!("Dropping non UTF-8 binary frame: {}", e);
                    }
                },
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    debug!("Received close frame: {:?}", frame);
                    return Err(ProtocolError::ConnectionClosed);
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(ProtocolError::ConnectionClosed),
            }
        }
    }
}

struct WriterInner<S> {
    sink: Mutex<Option<SplitSink<WebSocketStream<S>, Message>>>,
    closed: AtomicBool,
}

/// 帧写入器
///
/// 克隆开销很小，所有克隆共享同一个底层写入端。
pub struct FrameWriter<S> {
    inner: Arc<WriterInner<S>>,
}

impl<S> Clone for FrameWriter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> FrameWriter<S> {
    /// 连接是否已关闭
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// 同步标记关闭并尽力释放写入端（用于 Drop 等无法等待的场合）
    ///
    /// 若此时有写操作持锁，写入端由该写操作在返回前释放。
    pub fn release(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        if let Ok(mut guard) = self.inner.sink.try_lock() {
            guard.take();
        }
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> FrameWriter<S> {
    /// 编码并写入一条消息
    pub async fn send(&self, msg: &ClientMessage) -> Result<()> {
        let text = encode(msg)?;
        let mut guard = self.inner.sink.lock().await;
        if self.is_closed() {
            guard.take();
            return Err(ProtocolError::ConnectionClosed);
        }
        let Some(sink) = guard.as_mut() else {
            return Err(ProtocolError::ConnectionClosed);
        };

        let result = sink.send(Message::Text(text)).await;
        if result.is_err() {
            // 写失败后连接不可再用
            self.inner.closed.store(true, Ordering::SeqCst);
        }
        if self.is_closed() {
            // 写期间被 release 或写失败，在持锁处释放写入端
            guard.take();
        }
        result.map_err(Into::into)
    }

    /// 发送关闭帧并释放写入端，重复调用无副作用
    pub async fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let sink = self.inner.sink.lock().await.take();
        if let Some(mut sink) = sink {
            if let Err(e) = sink.send(Message::Close(None)).await {
                debug!("Close frame not delivered: {}", e);
            }
            let _ = sink.close().await;
        }
    }

}
