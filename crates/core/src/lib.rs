//! credhash-core - 密码哈希核心库
//!
//! 用 bcrypt 取代 SHA1/MD5 之类的快速摘要：
//!
//! - 新密码以 `$2a$<cost>$<salt><digest>` 格式存储，cost 可随时调整，已有哈希不受影响
//! - 验证时按存储值的前缀分派，bcrypt 走定时比较，旧格式交给宿主原有的算法
//! - 旧格式只能在用户登录时逐个升级（[`CredentialHasher::verify_and_upgrade`]）
//!
//! ```no_run
//! use credhash_config::HasherConfig;
//! use credhash_core::{CredentialHasher, FnScheme};
//!
//! # fn legacy_check(_: &[u8], _: &str) -> bool { false }
//! # fn legacy_encode(_: &[u8]) -> String { String::new() }
//! let config = HasherConfig::from_env()?;
//! let legacy = FnScheme::new(legacy_check, legacy_encode);
//! if let Some(hasher) = CredentialHasher::install(&config, legacy) {
//!     let stored = hasher.hash("correct horse battery staple")?;
//!     assert!(hasher.verify("correct horse battery staple", stored.as_str())?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod hasher;
mod observability;
pub mod ports;
pub mod service;
pub mod settings;
pub mod stored_hash;
pub mod verifier;
pub mod work_factor;

pub use error::{HasherError, HasherResult, INVALID_CREDENTIALS};
pub use hasher::{Credential, hash_password};
pub use ports::{CredentialAccount, FnScheme, LegacyScheme};
pub use service::CredentialHasher;
pub use settings::HasherSettings;
pub use stored_hash::{BcryptVariant, HashFormat, StoredHash, UNUSABLE_PASSWORD};
pub use verifier::{constant_time_eq, verify_password};
pub use work_factor::{
    DEFAULT_WORK_FACTOR, MAX_STORED_WORK_FACTOR, MAX_WORK_FACTOR, MIN_WORK_FACTOR, WorkFactor,
};
