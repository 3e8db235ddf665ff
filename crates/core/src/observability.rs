//! 凭证哈希 Metrics

use std::time::Duration;

use metrics::{counter, histogram};

/// 记录一次哈希生成
pub fn record_hash(scheme: &str, duration: Duration) {
    let labels = [("scheme", scheme.to_string())];

    counter!("credhash_hash_total", &labels).increment(1);
    histogram!("credhash_hash_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// 记录一次验证
pub fn record_verify(scheme: &str, success: bool) {
    let labels = [
        ("scheme", scheme.to_string()),
        ("success", success.to_string()),
    ];

    counter!("credhash_verify_total", &labels).increment(1);
}

/// 记录损坏的存储值
pub fn record_malformed_hash() {
    counter!("credhash_malformed_hash_total").increment(1);
}

/// 记录一次惰性升级
pub fn record_upgrade(from: &str) {
    let labels = [("from", from.to_string())];
    counter!("credhash_upgrade_total", &labels).increment(1);
}
