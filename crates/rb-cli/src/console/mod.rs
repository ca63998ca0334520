//! Line-oriented front end standing in for a chat gateway.
//! 以命令行代替聊天网关的前端。

mod line;
mod session;

pub use line::{parse_line, ConsoleCommand, ConsoleLine, Identity};
pub use session::ConsoleSession;
