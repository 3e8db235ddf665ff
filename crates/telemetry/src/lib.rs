//! credhash-telemetry - 可观测性库

use tracing::Span;
use tracing::field::Empty;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化 tracing
///
/// 已经安装过全局 subscriber 时返回 `false`
pub fn init_tracing(log_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .is_ok()
}

/// 创建凭证操作 Span
///
/// `scheme` 和 `success` 在操作完成后由调用方记录，明文和哈希值不进入 span。
pub fn credential_span(operation: &str) -> Span {
    tracing::info_span!(
        "credential",
        operation = operation,
        scheme = Empty,
        work_factor = Empty,
        success = Empty,
    )
}
