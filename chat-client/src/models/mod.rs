//! 平台数据类型
//!
//! 所有类型都在反序列化边界声明好必选/可选字段，未知字段直接丢弃。

mod asset;
mod category;
mod chatroom;
mod chatter;
mod emote;
mod message;
mod user;
mod video;

pub use asset::{Asset, ImageSource};
pub use category::{
    Category, CategorySearchHit, CategorySearchResult, ParentCategory, SearchCategory,
    SearchHighlight, TextHighlight, TextMatchInfo,
};
pub use chatroom::{ChatMode, Chatroom, ChatroomRules, StreamerRef};
pub use chatter::Chatter;
pub use emote::{Emote, EmoteSet, CHANNEL_EMOTE_SET, GLOBAL_EMOTE_SET};
pub use message::{
    Badge, Identity, Message, MessageKind, OriginalMessage, OriginalSender, ReplyMetadata, Sender,
};
pub use user::{BannerImage, Livestream, Socials, SubscriberBadge, User, UserProfile};
pub use video::Video;

#[cfg(test)]
pub(crate) use chatroom::tests::chatroom_json;
#[cfg(test)]
pub(crate) use user::tests::user_json;
