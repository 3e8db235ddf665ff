//! 宿主系统提供的接口
//!
//! 宿主在构造 [`CredentialHasher`](crate::CredentialHasher) 时注入原有的密码算法，
//! 此后所有哈希和验证都经由 `CredentialHasher`。

use std::sync::Arc;

use crate::stored_hash::StoredHash;

/// 宿主原有的快速摘要算法（SHA1/MD5 等）
#[cfg_attr(test, mockall::automock)]
pub trait LegacyScheme: Send + Sync {
    /// 原有的密码验证函数，存储值原样传入
    fn check_password(&self, plaintext: &[u8], stored: &str) -> bool;

    /// 原有的密码编码函数，只在慢哈希被关闭时使用
    fn encode(&self, plaintext: &[u8]) -> String;
}

impl<T: LegacyScheme + ?Sized> LegacyScheme for Arc<T> {
    fn check_password(&self, plaintext: &[u8], stored: &str) -> bool {
        (**self).check_password(plaintext, stored)
    }

    fn encode(&self, plaintext: &[u8]) -> String {
        (**self).encode(plaintext)
    }
}

/// 由两个函数组成的旧算法
pub struct FnScheme<C, E> {
    check: C,
    encode: E,
}

impl<C, E> FnScheme<C, E>
where
    C: Fn(&[u8], &str) -> bool + Send + Sync,
    E: Fn(&[u8]) -> String + Send + Sync,
{
    pub fn new(check: C, encode: E) -> Self {
        Self { check, encode }
    }
}

impl<C, E> LegacyScheme for FnScheme<C, E>
where
    C: Fn(&[u8], &str) -> bool + Send + Sync,
    E: Fn(&[u8]) -> String + Send + Sync,
{
    fn check_password(&self, plaintext: &[u8], stored: &str) -> bool {
        (self.check)(plaintext, stored)
    }

    fn encode(&self, plaintext: &[u8]) -> String {
        (self.encode)(plaintext)
    }
}

/// 持有密码哈希的账户实体
pub trait CredentialAccount {
    fn password_hash(&self) -> &str;

    /// 整体替换存储的哈希
    fn set_password_hash(&mut self, hash: StoredHash);
}
