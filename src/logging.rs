// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别与输出格式
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志初始化错误
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=roddar=trace
/// - RODDAR_LOG_FORMAT: 设为 json 时输出结构化 JSON 日志
///
/// 日志写到 stderr,stdout 只留给命令输出
///
/// # 错误
/// 全局订阅器已存在时返回错误 (例如嵌入到其他程序),由调用方决定如何处理
///
/// # 示例
/// ```no_run
/// use roddar::logging;
/// logging::init().expect("日志系统初始化失败");
/// ```
pub fn init() -> Result<(), InitError> {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("RODDAR_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        init_test();
        // 全局订阅器已安装
        assert!(init().is_err());
    }
}
