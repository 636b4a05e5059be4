//! dsasocio-core: domain rows and client-side logic for DSA Socio
//!
//! Everything here is pure: no I/O, no clocks except where a caller passes
//! one in. The relay server and CLI build on these types.

pub mod channel;
pub mod discover;
pub mod error;
pub mod models;
pub mod sheet;
pub mod timeline;

pub use channel::{chat_channel, ChannelKind, ChannelName, ChatId, SocketId};
pub use discover::{discover, PartnerFilter};
pub use error::{Result, SocioError};
pub use models::{
    ChatMessage, Difficulty, FriendRequest, Friendship, NewMessageEvent, Profile, RequestStatus,
    ValidationError,
};
pub use sheet::{build_tree, Progress, SheetNode, SheetTree};
pub use timeline::{ChatTimeline, EntryState, LocalId, TimelineEntry};
