//! Result cache domain types.
//! 结果缓存领域类型。

use std::sync::Arc;

use thiserror::Error;

use crate::computation::ComputationResult;
use crate::ids::{ChannelId, MessageId, UserId};
use crate::render::{NEXT_BUTTON_ID, PAGE_SIZE, PREVIOUS_BUTTON_ID};

/// A delivered result and the page it currently shows.
///
/// Only `page` (and the access bookkeeping) ever changes after insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub handle: MessageId,
    pub page: usize,
    pub result: Arc<ComputationResult>,
    pub channel_id: ChannelId,
    pub requester_id: UserId,
    pub inserted_at_ms: i64,
    pub last_access_ms: i64,
}

impl CacheEntry {
    /// Page reached by moving `delta` pages, if it holds at least one score.
    /// Page 0 of an empty result is the only page without scores.
    pub fn page_after(&self, delta: i64) -> Option<usize> {
        let target = i64::try_from(self.page).ok()?.checked_add(delta)?;
        let target = usize::try_from(target).ok()?;
        let len = self.result.scores.len();
        if target == 0 || target.checked_mul(PAGE_SIZE)? < len {
            Some(target)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no cached result for this message")]
    NotFound,

    #[error("only the requester can navigate this result")]
    Unauthorized,

    #[error("no page in that direction")]
    OutOfRange,
}

/// Navigation requested through a page button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Previous,
    Next,
}

impl NavAction {
    pub fn delta(self) -> i64 {
        match self {
            NavAction::Previous => -1,
            NavAction::Next => 1,
        }
    }

    /// Map a button id emitted by the renderer back to an action.
    pub fn from_button_id(custom_id: &str) -> Option<Self> {
        match custom_id {
            PREVIOUS_BUTTON_ID => Some(NavAction::Previous),
            NEXT_BUTTON_ID => Some(NavAction::Next),
            _ => None,
        }
    }
}
