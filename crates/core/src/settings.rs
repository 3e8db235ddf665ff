//! 运行时配置
//!
//! 每次操作都重新读取，宿主（例如测试）可以在运行中调整。

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use credhash_config::HasherConfig;

#[derive(Debug)]
pub struct HasherSettings {
    use_slow_hash: AtomicBool,
    work_factor: AtomicU32,
}

impl HasherSettings {
    pub fn new(use_slow_hash: bool, work_factor: u32) -> Self {
        Self {
            use_slow_hash: AtomicBool::new(use_slow_hash),
            work_factor: AtomicU32::new(work_factor),
        }
    }

    pub fn from_config(config: &HasherConfig) -> Self {
        Self::new(config.use_slow_hash, config.hash_work_factor)
    }

    pub fn use_slow_hash(&self) -> bool {
        self.use_slow_hash.load(Ordering::Relaxed)
    }

    /// 只影响之后生成的哈希，范围在哈希时才校验
    pub fn work_factor(&self) -> u32 {
        self.work_factor.load(Ordering::Relaxed)
    }

    pub fn set_use_slow_hash(&self, enabled: bool) {
        self.use_slow_hash.store(enabled, Ordering::Relaxed);
    }

    pub fn set_work_factor(&self, work_factor: u32) {
        self.work_factor.store(work_factor, Ordering::Relaxed);
    }

    /// 整体应用一份新加载的配置
    pub fn apply(&self, config: &HasherConfig) {
        self.set_use_slow_hash(config.use_slow_hash);
        self.set_work_factor(config.hash_work_factor);
    }
}

impl Default for HasherSettings {
    fn default() -> Self {
        Self::from_config(&HasherConfig::default())
    }
}
