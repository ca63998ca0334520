//! Page rendering for cached computation results.
//! 将计算结果渲染为分页内容。

mod page;
mod renderer;

pub use page::{page_count, page_range, Button, Embed, RenderedPage, NEXT_BUTTON_ID, PAGE_SIZE, PREVIOUS_BUTTON_ID};
pub use renderer::render_page;
