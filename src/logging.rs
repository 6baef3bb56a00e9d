// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// 日志统一输出到 stderr，stdout 留给报告
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 构造日志过滤器
///
/// # 参数
/// - default_level: RUST_LOG 未设置时的默认级别
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: 参数 default_level）
///   例如: RUST_LOG=debug 或 RUST_LOG=manifest_margin=trace
///
/// # 示例
/// ```no_run
/// use manifest_margin::logging;
/// logging::init("info");
/// ```
pub fn init(default_level: &str) {
    fmt()
        .with_env_filter(build_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化 JSON 格式日志（便于日志采集）
pub fn init_json(default_level: &str) {
    fmt()
        .json()
        .with_env_filter(build_filter(default_level))
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .init();
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
