//! 订阅管理
//!
//! 记录当前已订阅的主题集合。订阅与退订都不等待服务端确认。

use std::collections::HashSet;

use protocol::{ClientMessage, FrameWriter, Topic};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;

/// 订阅管理器
pub struct SubscriptionManager<S> {
    writer: FrameWriter<S>,
    /// 持锁期间完成发送，保证并发重复订阅只产生一帧
    topics: Mutex<HashSet<Topic>>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> SubscriptionManager<S> {
    pub fn new(writer: FrameWriter<S>) -> Self {
        Self {
            writer,
            topics: Mutex::new(HashSet::new()),
        }
    }

    /// 订阅主题，已订阅时不发送任何帧
    ///
    /// 返回是否实际发出了订阅帧。
    pub async fn subscribe(&self, topic: Topic) -> Result<bool> {
        let mut topics = self.topics.lock().await;
        if topics.contains(&topic) {
            debug!("Already subscribed to {}", topic);
            return Ok(false);
        }

        self.writer.send(&ClientMessage::subscribe(topic)).await?;
        topics.insert(topic);
        info!("Subscribed to {}", topic);
        Ok(true)
    }

    /// 退订主题
    ///
    /// 无论是否记录过该主题都会发送退订帧，重复退订不报错。
    /// 发送失败时主题同样被移除，重放时不会重新加入。
    pub async fn unsubscribe(&self, topic: Topic) -> Result<()> {
        let mut topics = self.topics.lock().await;
        let tracked = topics.remove(&topic);
        self.writer.send(&ClientMessage::unsubscribe(topic)).await?;
        if tracked {
            info!("Unsubscribed from {}", topic);
        } else {
            debug!("Unsubscribed from untracked topic {}", topic);
        }
        Ok(())
    }

    pub async fn is_subscribed(&self, topic: Topic) -> bool {
        self.topics.lock().await.contains(&topic)
    }

    /// 当前持有的主题（有序），供重连后重放
    pub async fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.lock().await.iter().copied().collect();
        topics.sort();
        topics
    }
}
