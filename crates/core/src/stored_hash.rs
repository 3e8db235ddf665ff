//! 存储的密码哈希
//!
//! 格式为 `$<algo>$<cost>$<salt><digest>`，salt 为 22 个字符、digest 为 31 个字符，
//! 均使用 bcrypt 的 base64 字母表（`./A-Za-z0-9`，无填充）。
//! 不以 `$` 开头的值属于宿主原有的旧格式；`!` 开头表示账户没有可用密码。

use std::fmt;

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde::{Deserialize, Serialize};

use crate::error::{HasherError, HasherResult};
use crate::work_factor::WorkFactor;

/// 不可用密码标记，任何明文都无法与之匹配
pub const UNUSABLE_PASSWORD: &str = "!";

pub(crate) const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 23;
const ENCODED_SALT_LEN: usize = 22;
const ENCODED_LEN: usize = 53;
/// bcrypt 只使用密钥的前 72 个字节
const MAX_KEY_LEN: usize = 72;

const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// bcrypt 版本标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcryptVariant {
    /// `$2$`，最早的版本，密钥不含结尾的 NUL
    Two,
    /// `$2a$`，新生成的哈希统一使用此版本
    TwoA,
    TwoB,
    TwoY,
    /// `$bcrypt$`
    Named,
}

impl BcryptVariant {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "2" => Some(Self::Two),
            "2a" => Some(Self::TwoA),
            "2b" => Some(Self::TwoB),
            "2y" => Some(Self::TwoY),
            "bcrypt" => Some(Self::Named),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::TwoA => "2a",
            Self::TwoB => "2b",
            Self::TwoY => "2y",
            Self::Named => "bcrypt",
        }
    }

    fn appends_nul(self) -> bool {
        !matches!(self, Self::Two)
    }
}

impl fmt::Display for BcryptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 从存储值中解析出的算法信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFormat {
    Bcrypt {
        variant: BcryptVariant,
        work_factor: WorkFactor,
    },
    Legacy,
    Unusable,
}

impl HashFormat {
    /// 用于日志和指标的算法名
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Bcrypt { .. } => "bcrypt",
            Self::Legacy => "legacy",
            Self::Unusable => "unusable",
        }
    }
}

/// 存储的密码哈希
///
/// 一经生成不再修改，修改密码时整体替换。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredHash(String);

impl StoredHash {
    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn unusable() -> Self {
        Self(UNUSABLE_PASSWORD.to_string())
    }

    pub fn is_unusable(&self) -> bool {
        self.0.starts_with(UNUSABLE_PASSWORD)
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// 仅凭字符串本身解析出算法和工作因子
    pub fn format(&self) -> HasherResult<HashFormat> {
        Ok(match parse(&self.0)? {
            ParsedHash::Unusable => HashFormat::Unusable,
            ParsedHash::Legacy => HashFormat::Legacy,
            ParsedHash::Bcrypt(parts) => HashFormat::Bcrypt {
                variant: parts.variant,
                work_factor: parts.work_factor,
            },
        })
    }
}

impl AsRef<str> for StoredHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

#[derive(Debug)]
pub(crate) enum ParsedHash {
    Unusable,
    Legacy,
    Bcrypt(BcryptParts),
}

#[derive(Debug)]
pub(crate) struct BcryptParts {
    pub(crate) variant: BcryptVariant,
    pub(crate) work_factor: WorkFactor,
    pub(crate) salt: [u8; SALT_LEN],
}

/// 解析存储值
///
/// 以 `$` 开头但无法解析的值一律视为数据损坏，而不是验证失败。
pub(crate) fn parse(stored: &str) -> HasherResult<ParsedHash> {
    if stored.is_empty() {
        return Err(HasherError::malformed("stored hash is empty"));
    }
    if stored.starts_with(UNUSABLE_PASSWORD) {
        return Ok(ParsedHash::Unusable);
    }
    let Some(body) = stored.strip_prefix('$') else {
        return Ok(ParsedHash::Legacy);
    };

    let mut fields = body.splitn(3, '$');
    let tag = fields.next().unwrap_or_default();
    let variant = BcryptVariant::from_tag(tag)
        .ok_or_else(|| HasherError::malformed("unrecognised algorithm tag"))?;
    let cost = fields
        .next()
        .ok_or_else(|| HasherError::malformed("missing cost field"))?;
    let work_factor = parse_cost(cost)?;
    let encoded = fields
        .next()
        .ok_or_else(|| HasherError::malformed("missing salt and digest"))?;

    if encoded.len() != ENCODED_LEN || !encoded.bytes().all(is_bcrypt_base64) {
        return Err(HasherError::malformed(
            "salt and digest must be 53 characters of the bcrypt alphabet",
        ));
    }
    let salt = decode_salt(&encoded[..ENCODED_SALT_LEN])?;

    Ok(ParsedHash::Bcrypt(BcryptParts {
        variant,
        work_factor,
        salt,
    }))
}

fn parse_cost(cost: &str) -> HasherResult<WorkFactor> {
    if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HasherError::malformed("cost must be two decimal digits"));
    }
    let value: u32 = cost
        .parse()
        .map_err(|_| HasherError::malformed("cost must be two decimal digits"))?;
    WorkFactor::from_stored(value)
        .ok_or_else(|| HasherError::malformed(format!("cost {value} is out of range")))
}

fn is_bcrypt_base64(b: u8) -> bool {
    b == b'.' || b == b'/' || b.is_ascii_alphanumeric()
}

fn decode_salt(encoded: &str) -> HasherResult<[u8; SALT_LEN]> {
    BCRYPT_BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| <[u8; SALT_LEN]>::try_from(bytes.as_slice()).ok())
        .ok_or_else(|| HasherError::malformed("salt is not decodable"))
}

fn derive_key(variant: BcryptVariant, plaintext: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(plaintext.len() + 1);
    key.extend_from_slice(plaintext);
    // `$2$` 的空密码在 C 实现里读到的就是结尾的 NUL
    if variant.appends_nul() || key.is_empty() {
        key.push(0);
    }
    key.truncate(MAX_KEY_LEN);
    key
}

/// 运行 bcrypt 并编码为完整的存储格式
pub(crate) fn compute(
    variant: BcryptVariant,
    work_factor: WorkFactor,
    salt: &[u8; SALT_LEN],
    plaintext: &[u8],
) -> String {
    let key = derive_key(variant, plaintext);
    let output = bcrypt::bcrypt(work_factor.get(), *salt, &key);
    format!(
        "${}${}${}{}",
        variant,
        work_factor,
        BCRYPT_BASE64.encode(salt),
        BCRYPT_BASE64.encode(&output[..DIGEST_LEN])
    )
}
