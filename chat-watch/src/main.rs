//! 聊天室观察工具
//!
//! 连接网关、订阅命令行给出的聊天室，打印收到的每条聊天消息直到 Ctrl+C。

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use kick_chat::{Gateway, GatewayConfig, StopReason, Topic};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chat-watch", about = "Watch Kick chatrooms from the terminal")]
struct Args {
    /// 要订阅的聊天室 id
    #[arg(required = true)]
    chatrooms: Vec<u64>,

    /// 覆盖网关地址（默认读取 KICK_GATEWAY_URL）
    #[arg(long)]
    url: Option<String>,

    /// 心跳间隔（秒）
    #[arg(long)]
    heartbeat: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("chat_watch=info".parse()?)
                .add_directive("kick_chat=info".parse()?)
                .add_directive("protocol=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = GatewayConfig::from_env();
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(secs) = args.heartbeat {
        config.heartbeat_interval = Duration::from_secs(secs.max(1));
    }

    let gateway = Gateway::connect(&config).await?;

    gateway.on_message(|msg| async move {
        let author = msg.author().unwrap_or("<unknown>");
        let room = msg.chatroom_id.map(|id| id.to_string()).unwrap_or_default();
        if msg.is_reply() {
            info!("[{}] {} (reply): {}", room, author, msg.content);
        } else {
            info!("[{}] {}: {}", room, author, msg.content);
        }
        Ok(())
    });

    if let Some(mut failures) = gateway.handler_failures() {
        tokio::spawn(async move {
            while let Some(failure) = failures.recv().await {
                warn!("Handler {:?} failed: {:#}", failure.handler, failure.error);
            }
        });
    }

    let mut handle = gateway.start()?;

    for id in args.chatrooms {
        gateway.subscribe(Topic::Chatroom(id)).await?;
    }

    let reason = tokio::select! {
        result = &mut handle => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
            gateway.shutdown();
            handle.await?
        }
    };

    match reason {
        StopReason::Cancelled | StopReason::Closed => {
            info!("Stopped: {:?}", reason);
            Ok(())
        }
        StopReason::Failed(e) => Err(e.into()),
    }
}
