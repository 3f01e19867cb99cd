//! 协议常量定义

use std::time::Duration;

/// Kick 公共 Pusher 网关地址
pub const DEFAULT_GATEWAY_URL: &str =
    "wss://ws-us2.pusher.com/app/eb1d5f283081a78b932c?protocol=7&client=js&version=7.4.0&flash=false";

/// 聊天室频道命名空间
pub const CHATROOM_NAMESPACE: &str = "chatrooms";

/// 频道协议版本后缀
pub const CHANNEL_VERSION: &str = "v2";

/// 订阅事件名
pub const EVENT_SUBSCRIBE: &str = "pusher:subscribe";

/// 退订事件名
pub const EVENT_UNSUBSCRIBE: &str = "pusher:unsubscribe";

/// 心跳请求事件名
pub const EVENT_PING: &str = "pusher:ping";

/// 心跳响应事件名
pub const EVENT_PONG: &str = "pusher:pong";

/// 连接建立事件名
pub const EVENT_CONNECTION_ESTABLISHED: &str = "pusher:connection_established";

/// 订阅成功事件名
pub const EVENT_SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";

/// 网关错误事件名
pub const EVENT_ERROR: &str = "pusher:error";

/// 聊天消息类型
pub const TYPE_MESSAGE: &str = "message";

/// 回复消息类型
pub const TYPE_REPLY: &str = "reply";

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// 客户端心跳间隔（秒）
pub const HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 心跳间隔 Duration
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(HEARTBEAT_INTERVAL_SECS);

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);
