//! # rb-core
//!
//! Core domain models and business logic for rework-bot.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the request queue, the page renderer, command parsing and the ports the
//! outer layers implement.

// Public module exports
pub mod cache;
pub mod command;
pub mod computation;
pub mod config;
pub mod ids;
pub mod ports;
pub mod queue;
pub mod render;

// Re-export commonly used types at the crate root
pub use cache::{CacheEntry, NavAction, NavigationError};
pub use command::{parse_calculate_command, CommandError};
pub use computation::{ComputationResult, JobEvent, JobFailure, ProgressEvent, ScoreRecord};
pub use config::AppConfig;
pub use ids::{ChannelId, GuildId, MessageId, SubjectId, UserId};
pub use queue::{EnqueueOutcome, EtaEstimate, OriginRef, QueueEntry, RequestQueue};
pub use render::{render_page, RenderedPage, PAGE_SIZE};
