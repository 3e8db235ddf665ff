//! credhash-config - 配置加载库
//!
//! 加载顺序：内置默认值 -> 可选的 TOML 文件 -> 环境变量
//! (`USE_SLOW_HASH`, `HASH_WORK_FACTOR`)
//!
//! 本地开发可以先用 [`HasherConfig::from_env_with_dotenv`] 读入 `.env`。

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 识别的环境变量
pub const ENV_KEYS: &[&str] = &["USE_SLOW_HASH", "HASH_WORK_FACTOR"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
    #[error("Failed to read .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

/// 密码哈希配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    /// 关闭后不启用慢哈希，宿主保留原有的摘要算法（主要用于加快测试）
    #[serde(default = "default_use_slow_hash")]
    pub use_slow_hash: bool,
    /// bcrypt cost（log2 迭代次数），只影响新生成的哈希
    #[serde(default = "default_work_factor")]
    pub hash_work_factor: u32,
}

fn default_use_slow_hash() -> bool {
    true
}

fn default_work_factor() -> u32 {
    12
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            use_slow_hash: default_use_slow_hash(),
            hash_work_factor: default_work_factor(),
        }
    }
}

impl HasherConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::figment(None).extract()?)
    }

    /// 先把 `.env` 读进进程环境，再按 [`HasherConfig::from_env`] 加载
    ///
    /// `env_file` 为 `None` 时从当前目录向上查找 `.env`。文件不存在不算错误；
    /// 已经存在的环境变量不会被 `.env` 覆盖。
    pub fn from_env_with_dotenv(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        match loaded {
            Err(err) if !err.not_found() => return Err(err.into()),
            _ => {}
        }
        Self::from_env()
    }

    /// 从 TOML 文件和环境变量加载配置，环境变量优先
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(Some(config_file.as_ref())).extract()?)
    }

    /// 构建 figment，宿主可以在此基础上继续 merge 自己的 provider
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::raw().only(ENV_KEYS))
    }
}
