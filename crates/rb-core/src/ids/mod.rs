//! ID type wrappers for type safety.

mod id_macro;
pub mod platform;
pub mod subject_id;

pub use platform::{ChannelId, GuildId, MessageId, UserId};
pub use subject_id::{InvalidSubjectId, SubjectId};
