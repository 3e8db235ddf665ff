//! 验证明文凭证与存储哈希是否匹配

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{HasherError, HasherResult};
use crate::ports::LegacyScheme;
use crate::stored_hash::{self, ParsedHash};

/// 一次验证的结果以及走的是哪条路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub(crate) scheme: &'static str,
    pub(crate) matched: bool,
}

/// 验证明文与存储哈希
///
/// - `$2$` / `$2a$` / `$bcrypt$`（以及 `$2b$` / `$2y$`）：用存储值中的 salt 和 cost 重新计算，
///   再与存储值做定时比较
/// - `!` 开头：不可用密码，总是 `false`
/// - 其他不以 `$` 开头的值：原样交给宿主的旧算法
///
/// 空字符串或无法解析的 `$` 格式返回 `HasherError::MalformedHash`，不会当作验证失败。
pub fn verify_password<L: LegacyScheme + ?Sized>(
    plaintext: impl AsRef<[u8]>,
    stored: &str,
    legacy: &L,
) -> HasherResult<bool> {
    verify_detailed(plaintext.as_ref(), stored, legacy).map(|verdict| verdict.matched)
}

pub(crate) fn verify_detailed<L: LegacyScheme + ?Sized>(
    plaintext: &[u8],
    stored: &str,
    legacy: &L,
) -> HasherResult<Verdict> {
    match stored_hash::parse(stored)? {
        ParsedHash::Unusable => Ok(Verdict {
            scheme: "unusable",
            matched: false,
        }),
        ParsedHash::Legacy => {
            debug!("stored hash is not bcrypt, delegating to legacy scheme");
            Ok(Verdict {
                scheme: "legacy",
                matched: legacy.check_password(plaintext, stored),
            })
        }
        ParsedHash::Bcrypt(parts) => {
            let candidate =
                stored_hash::compute(parts.variant, parts.work_factor, &parts.salt, plaintext);
            Ok(Verdict {
                scheme: "bcrypt",
                matched: constant_time_eq(candidate.as_bytes(), stored.as_bytes()),
            })
        }
    }
}

/// 慢哈希关闭时的验证：除不可用标记外全部交给旧算法
pub(crate) fn verify_legacy_only<L: LegacyScheme + ?Sized>(
    plaintext: &[u8],
    stored: &str,
    legacy: &L,
) -> HasherResult<Verdict> {
    if stored.is_empty() {
        return Err(HasherError::malformed("stored hash is empty"));
    }
    if stored.starts_with(stored_hash::UNUSABLE_PASSWORD) {
        return Ok(Verdict {
            scheme: "unusable",
            matched: false,
        });
    }
    Ok(Verdict {
        scheme: "legacy",
        matched: legacy.check_password(plaintext, stored),
    })
}

/// 定长比较，耗时与第一个不同字节的位置无关
///
/// 逐字节比较交给 `subtle::ConstantTimeEq`，遍历全部输入，不在第一个不同字节处返回。
/// 长度不同时直接返回 `false`，长度本身不是秘密。
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
