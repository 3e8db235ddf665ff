//! 生成新的存储哈希

use rand::{RngCore, rngs::OsRng};

use crate::error::HasherResult;
use crate::stored_hash::{self, BcryptVariant, SALT_LEN, StoredHash};
use crate::work_factor::WorkFactor;

/// 待哈希的凭证
///
/// `Unusable` 表示账户没有密码，与空字符串不同。
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    Plain(&'a [u8]),
    Unusable,
}

impl<'a> From<&'a str> for Credential<'a> {
    fn from(plaintext: &'a str) -> Self {
        Self::Plain(plaintext.as_bytes())
    }
}

impl<'a> From<&'a String> for Credential<'a> {
    fn from(plaintext: &'a String) -> Self {
        Self::Plain(plaintext.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Credential<'a> {
    fn from(plaintext: &'a [u8]) -> Self {
        Self::Plain(plaintext)
    }
}

impl<'a> From<Option<&'a str>> for Credential<'a> {
    fn from(plaintext: Option<&'a str>) -> Self {
        plaintext.map_or(Self::Unusable, Self::from)
    }
}

impl std::fmt::Debug for Credential<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Credential::Plain([REDACTED])"),
            Self::Unusable => f.write_str("Credential::Unusable"),
        }
    }
}

/// 用 bcrypt 哈希凭证
///
/// 每次调用都从操作系统随机源生成新的 salt。`work_factor` 超出 4..=20 时返回
/// `HasherError::Configuration`。`Credential::Unusable` 直接返回不可用标记。
pub fn hash_password<'a>(
    credential: impl Into<Credential<'a>>,
    work_factor: u32,
) -> HasherResult<StoredHash> {
    let plaintext = match credential.into() {
        Credential::Plain(plaintext) => plaintext,
        Credential::Unusable => return Ok(StoredHash::unusable()),
    };
    let work_factor = WorkFactor::new(work_factor)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    Ok(StoredHash::from_hash(stored_hash::compute(
        BcryptVariant::TwoA,
        work_factor,
        &salt,
        plaintext,
    )))
}
