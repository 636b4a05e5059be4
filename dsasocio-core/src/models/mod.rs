//! Rows mirroring the hosted database tables
//!
//! Field names follow the database columns so rows round-trip through
//! serde untouched. Constructors for user input validate at creation.

pub mod friends;
pub mod message;
pub mod profile;
pub mod sheet;
pub mod validation;

pub use friends::{FriendRequest, Friendship, RequestStatus};
pub use message::{ChatMessage, MessageText, NewMessageEvent, DEFAULT_SENDER_NAME};
pub use profile::{Language, NewProfile, Profile, Role, SkillLevel};
pub use sheet::{
    Difficulty, DsaFolder, DsaProblem, ItemType, NewProblem, SharedItem, SharedProblem,
    SharedSheet,
};
pub use validation::ValidationError;
