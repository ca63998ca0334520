//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into the `AppConfig` DTO. Missing keys take their
//! defaults; nothing is validated here.
//! 读取 TOML 文件并映射为 AppConfig，不做校验。

use std::path::Path;

use anyhow::Context;
use rb_core::AppConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML for
/// `AppConfig`.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config = AppConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    resolve_paths(config)
}

/// Make `output_dir` absolute.
///
/// A relative `output_dir` is relative to the calculator's working directory.
/// The result is absolute because the calculator receives it as `-o` while
/// running inside that directory.
pub fn resolve_paths(mut config: AppConfig) -> anyhow::Result<AppConfig> {
    let calculator = &mut config.calculator;
    let output_dir = if calculator.output_dir.is_relative() {
        calculator.working_dir.join(&calculator.output_dir)
    } else {
        calculator.output_dir.clone()
    };
    calculator.output_dir = std::path::absolute(&output_dir).with_context(|| {
        format!("Failed to resolve output directory: {}", output_dir.display())
    })?;
    Ok(config)
}
