use std::env;

use once_cell::sync::Lazy;
use regex::Regex;

/// `{{env.NAME}}` 占位符，导出的运行时会在调用时用进程环境变量替换
pub const ENV_PLACEHOLDER_PATTERN: &str = r"\{\{env\.([A-Za-z_][A-Za-z0-9_]*)\}\}";

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(ENV_PLACEHOLDER_PATTERN).expect("env placeholder pattern is a valid regex")
});

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 提取值中引用的所有环境变量名（按出现顺序，可能重复）
    pub fn placeholders(value: &str) -> Vec<&str> {
        ENV_PLACEHOLDER
            .captures_iter(value)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var("CREWFORGE_DEBUG").is_ok()
    }
}
