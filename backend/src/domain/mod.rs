//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed portal entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Layout:
//! - `error` — the API error payload and stable error codes.
//! - `user` — accounts, roles and the validated identity newtypes.
//! - `post`, `comment` — the moderated community feed.
//! - `suggestion`, `announcement`, `achievement` — member and staff boards.
//! - `library` — career resources, study resources and tutorials.
//! - `forum` — discussion threads and replies.
//! - `presentation` — server-computed avatar colours, initials and
//!   relative timestamps.
//! - `ports` — the driving traits inbound adapters depend on.

pub mod achievement;
pub mod announcement;
pub mod comment;
pub mod error;
pub mod forum;
pub mod library;
pub mod ports;
pub mod post;
pub mod presentation;
pub mod suggestion;
pub mod user;

pub use self::achievement::{Achievement, AchievementValidationError};
pub use self::announcement::{Announcement, AnnouncementValidationError};
pub use self::comment::{Comment, CommentValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::forum::{ForumReply, ForumThread, ForumValidationError};
pub use self::library::{LibraryItem, LibraryKind, LibraryValidationError};
pub use self::post::{
    ModerationStatus, Post, PostDraft, PostKind, PostValidationError, Tag,
};
pub use self::suggestion::{Suggestion, SuggestionValidationError};
pub use self::user::{DisplayName, Email, Role, User, UserId, UserValidationError};
