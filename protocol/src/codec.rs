//! 帧编解码
//!
//! 入站帧为两层结构：外层 Pusher 信封的 `data` 字段本身是一个 JSON 字符串，
//! 需要再解码一次才能得到内层文档。
//!
//! ```text
//! {"event": "App\\Events\\ChatMessageEvent",
//!  "channel": "chatrooms.42.v2",
//!  "data": "{\"type\":\"message\",\"content\":\"hi\", ...}"}
//! ```
//!
//! 解码失败不会向上传播为错误，而是返回 [`DecodeSkip`]，由调用方丢弃该帧。

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ProtocolError, Result};
use crate::message::ClientMessage;
use crate::MAX_FRAME_SIZE;

/// 外层传输信封
#[derive(Deserialize, Debug, Default)]
struct Envelope {
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// 已分类的入站事件
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent {
    /// 事件名：优先取内层文档的 `type`，否则取外层 `event`
    pub name: String,
    /// 外层信封上的 Pusher 事件名
    pub envelope_event: Option<String>,
    /// 帧所属频道
    pub channel: Option<String>,
    /// 已解码的内层文档
    pub data: Value,
}

impl ClassifiedEvent {
    /// 内层文档的对象视图
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.data.as_object()
    }
}

/// 帧被丢弃的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeSkip {
    /// 外层信封无法解析
    MalformedEnvelope(String),
    /// 内层文档无法解析
    MalformedPayload(String),
    /// 既没有内层 `type` 也没有外层 `event`
    Unnamed,
    /// 内层文档结构与事件类型不符
    UnexpectedShape { name: String, reason: String },
}

impl fmt::Display for DecodeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeSkip::MalformedEnvelope(e) => write!(f, "malformed envelope: {e}"),
            DecodeSkip::MalformedPayload(e) => write!(f, "malformed payload: {e}"),
            DecodeSkip::Unnamed => f.write_str("frame carries no event name"),
            DecodeSkip::UnexpectedShape { name, reason } => {
                write!(f, "unexpected shape for {name}: {reason}")
            }
        }
    }
}

/// 解码并分类一帧入站消息
pub fn decode(raw: &str) -> std::result::Result<ClassifiedEvent, DecodeSkip> {
    // 第一阶段：外层信封
    let envelope: Envelope = serde_json::from_str(raw)
        .map_err(|e| DecodeSkip::MalformedEnvelope(e.to_string()))?;

    // 第二阶段：内层文档（字符串则再解码一次）
    let data = match envelope.data {
        Some(Value::String(inner)) => serde_json::from_str::<Value>(&inner)
            .map_err(|e| DecodeSkip::MalformedPayload(e.to_string()))?,
        Some(other) => other,
        None => Value::Null,
    };

    let inner_type = data
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let name = inner_type
        .or_else(|| envelope.event.clone())
        .ok_or(DecodeSkip::Unnamed)?;

    Ok(ClassifiedEvent {
        name,
        envelope_event: envelope.event,
        channel: envelope.channel,
        data,
    })
}

/// 编码一条出站消息
pub fn encode(msg: &ClientMessage) -> Result<String> {
    let text = serde_json::to_string(msg)?;
    if text.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: text.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topic;
    use serde_json::json;

    #[test]
    fn test_decode_nested_chat_message() {
        let inner = json!({"type": "message", "content": "hi", "chatroom_id": 42});
        let raw = json!({
            "event": "App\\Events\\ChatMessageEvent",
            "channel": "chatrooms.42.v2",
            "data": inner.to_string(),
        })
        .to_string();

        let event = decode(&raw).unwrap();
        assert_eq!(event.name, "message");
        assert_eq!(event.envelope_event.as_deref(), Some("App\\Events\\ChatMessageEvent"));
        assert_eq!(event.channel.as_deref(), Some("chatrooms.42.v2"));
        assert_eq!(event.data, inner);
    }

    #[test]
    fn test_decode_envelope_without_event() {
        let raw = r#"{"data": "{\"type\":\"message\",\"content\":\"hi\"}"}"#;
        let event = decode(raw).unwrap();
        assert_eq!(event.name, "message");
        assert_eq!(event.envelope_event, None);
        assert_eq!(event.data["content"], "hi");
    }

    #[test]
    fn test_decode_object_payload_used_as_is() {
        let raw = r#"{"event": "pusher:ping", "data": {}}"#;
        let event = decode(raw).unwrap();
        assert_eq!(event.name, "pusher:ping");
        assert_eq!(event.data, json!({}));
    }

    #[test]
    fn test_decode_missing_data_falls_back_to_event_name() {
        let event = decode(r#"{"event": "pusher:pong"}"#).unwrap();
        assert_eq!(event.name, "pusher:pong");
        assert_eq!(event.data, Value::Null);
    }

    #[test]
    fn test_outer_type_is_never_read() {
        // 外层的 type 字段不参与分类
        let raw = r#"{"type": "message", "data": "{\"content\":\"hi\"}"}"#;
        assert_eq!(decode(raw), Err(DecodeSkip::Unnamed));
    }

    #[test]
    fn test_decode_malformed_envelope_is_skipped() {
        assert!(matches!(
            decode("not json at all"),
            Err(DecodeSkip::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_decode_malformed_inner_payload_is_skipped() {
        let raw = r#"{"event": "App\\Events\\ChatMessageEvent", "data": "{\"type\": \"message\", "}"#;
        assert!(matches!(decode(raw), Err(DecodeSkip::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_unknown_type_is_classified() {
        let raw = json!({"data": json!({"type": "gift_sub", "count": 5}).to_string()}).to_string();
        let event = decode(&raw).unwrap();
        assert_eq!(event.name, "gift_sub");
        assert_eq!(event.fields().map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_encode_subscribe() {
        let text = encode(&ClientMessage::subscribe(Topic::Chatroom(1))).unwrap();
        assert!(text.contains("chatrooms.1.v2"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn extra_fields() -> impl Strategy<Value = serde_json::Map<String, Value>> {
            proptest::collection::btree_map(
                "[a-z_]{1,8}",
                prop_oneof![
                    any::<i64>().prop_map(Value::from),
                    ".*".prop_map(Value::from),
                    any::<bool>().prop_map(Value::from),
                ],
                0..8,
            )
            .prop_map(|fields| fields.into_iter().filter(|(k, _)| k != "type").collect())
        }

        proptest! {
            #[test]
            fn nested_payload_survives_double_decode(
                mut fields in extra_fields(),
                kind in "[a-z_]{1,16}",
                event in proptest::option::of("[A-Za-z\\\\:_]{1,32}"),
            ) {
                fields.insert("type".to_string(), Value::from(kind.clone()));
                let inner = Value::Object(fields);
                let mut envelope = json!({"data": inner.to_string(), "channel": "chatrooms.7.v2"});
                if let Some(event) = &event {
                    envelope["event"] = Value::from(event.clone());
                }

                let decoded = decode(&envelope.to_string()).unwrap();
                prop_assert_eq!(&decoded.name, &kind);
                prop_assert_eq!(decoded.envelope_event, event);
                prop_assert_eq!(decoded.data, inner);
            }

            #[test]
            fn object_payload_matches_string_payload(fields in extra_fields(), kind in "[a-z_]{1,16}") {
                let mut fields = fields;
                fields.insert("type".to_string(), Value::from(kind));
                let inner = Value::Object(fields);
                let as_string = decode(&json!({"data": inner.to_string()}).to_string()).unwrap();
                let as_object = decode(&json!({"data": inner}).to_string()).unwrap();
                prop_assert_eq!(as_string, as_object);
            }

            #[test]
            fn arbitrary_text_never_panics(raw in ".*") {
                let _ = decode(&raw);
            }
        }
    }
}
