//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for use case construction. Not a builder: every port
//! is required and nothing is defaulted.
//! 用例构造所需的依赖分组，所有依赖都是必需的。

use std::sync::Arc;

use rb_core::ports::{JobRunnerPort, MessengerPort, ResultCachePort};

pub struct AppDeps {
    pub job_runner: Arc<dyn JobRunnerPort>,
    pub messenger: Arc<dyn MessengerPort>,
    pub result_cache: Arc<dyn ResultCachePort>,
}
