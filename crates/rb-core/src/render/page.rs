use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Scores shown per page.
pub const PAGE_SIZE: usize = 5;

pub const PREVIOUS_BUTTON_ID: &str = "previous";
pub const NEXT_BUTTON_ID: &str = "next";

/// Renderable content handed verbatim to the messenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Plain message content (mentions the requester)
    pub content: String,
    pub embed: Embed,
    pub buttons: Vec<Button>,
    pub page: usize,
    /// Indices into `ComputationResult::scores` shown on this page
    pub item_range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
}

/// Number of pages for `len` items. An empty result still has page 0.
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

/// Item indices of `page`, clipped to `len`.
pub fn page_range(page: usize, len: usize) -> Range<usize> {
    let start = page.saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    start..end
}
