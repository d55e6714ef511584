use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EnvConfig;

const DEFAULT_FILTER: &str = "crewforge=info,warn";
const DEBUG_FILTER: &str = "crewforge=debug,info";

/// 命令行的日志输出，全部写到 stderr，stdout 留给命令结果
pub struct LoggingConfig;

impl LoggingConfig {
    /// `RUST_LOG` 优先；否则按 `CREWFORGE_DEBUG` 选择默认过滤器。
    /// 已经初始化过时什么也不做。
    pub fn init() {
        let debug = Self::is_debug();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::fallback_filter(debug)));

        // 调试模式附带 target 与源码位置
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(debug)
            .with_file(debug)
            .with_line_number(debug);

        if tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .is_ok()
            && debug
        {
            tracing::debug!("debug logging enabled");
        }
    }

    pub fn is_debug() -> bool {
        EnvConfig::is_debug_mode()
    }

    fn fallback_filter(debug: bool) -> &'static str {
        if debug {
            DEBUG_FILTER
        } else {
            DEFAULT_FILTER
        }
    }
}
