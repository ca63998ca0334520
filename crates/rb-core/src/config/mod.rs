//! # Configuration DTO / 配置数据结构
//!
//! Plain data mapped from the TOML configuration file. Loading the file and
//! resolving relative paths happens in the bootstrap layer; credentials never
//! live here, they come from the environment.

mod defaults;
mod model;

pub use model::*;

impl AppConfig {
    /// Parse a TOML document. Missing sections and keys fall back to defaults.
    /// 解析 TOML 文档，缺失的部分使用默认值。
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
