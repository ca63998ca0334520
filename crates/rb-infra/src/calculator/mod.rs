//! External performance calculator adapter.
//! 外部 pp 计算器进程适配器。

mod invocation;
mod process_runner;
mod stream_monitor;

pub use invocation::{CalculatorCredentials, CalculatorInvocation};
pub use process_runner::ProcessJobRunner;
pub use stream_monitor::{StreamMonitor, COMPLETION_MARKER};
