//! 凭证哈希服务
//!
//! 宿主在启动时根据 `use_slow_hash` 决定是否安装，然后把账户的设置密码和登录验证
//! 都交给 [`CredentialHasher`]。

use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use credhash_config::HasherConfig;
use credhash_telemetry::credential_span;
use tracing::{info, warn};

use crate::error::HasherResult;
use crate::hasher::{Credential, hash_password};
use crate::observability;
use crate::ports::{CredentialAccount, LegacyScheme};
use crate::settings::HasherSettings;
use crate::stored_hash::{self, BcryptVariant, ParsedHash, SALT_LEN, StoredHash};
use crate::verifier::{verify_detailed, verify_legacy_only};
use crate::work_factor::WorkFactor;

/// 凭证哈希服务
pub struct CredentialHasher<L> {
    settings: Arc<HasherSettings>,
    legacy: L,
}

impl<L: LegacyScheme> CredentialHasher<L> {
    /// 按配置安装
    ///
    /// `use_slow_hash = false` 时返回 `None`，宿主继续使用原有算法。
    pub fn install(config: &HasherConfig, legacy: L) -> Option<Self> {
        if !config.use_slow_hash {
            info!("slow password hashing disabled, keeping legacy scheme");
            return None;
        }

        info!(
            work_factor = config.hash_work_factor,
            "slow password hashing enabled"
        );
        Some(Self::new(
            Arc::new(HasherSettings::from_config(config)),
            legacy,
        ))
    }

    pub fn new(settings: Arc<HasherSettings>, legacy: L) -> Self {
        Self { settings, legacy }
    }

    pub fn settings(&self) -> &Arc<HasherSettings> {
        &self.settings
    }

    pub fn legacy(&self) -> &L {
        &self.legacy
    }

    /// 用当前配置的工作因子生成存储哈希
    pub fn hash<'a>(&self, credential: impl Into<Credential<'a>>) -> HasherResult<StoredHash> {
        let span = credential_span("hash");
        let _enter = span.enter();

        let plaintext = match credential.into() {
            Credential::Plain(plaintext) => plaintext,
            Credential::Unusable => {
                span.record("scheme", "unusable");
                return Ok(StoredHash::unusable());
            }
        };

        let started = Instant::now();
        if !self.settings.use_slow_hash() {
            span.record("scheme", "legacy");
            let hash = StoredHash::from_hash(self.legacy.encode(plaintext));
            observability::record_hash("legacy", started.elapsed());
            return Ok(hash);
        }

        let work_factor = self.settings.work_factor();
        span.record("scheme", "bcrypt");
        span.record("work_factor", work_factor);

        let hash = hash_password(Credential::Plain(plaintext), work_factor)
            .inspect_err(|err| warn!(error = %err, "refusing to hash password"))?;
        observability::record_hash("bcrypt", started.elapsed());
        Ok(hash)
    }

    /// 验证明文与存储值
    ///
    /// 密码错误返回 `Ok(false)`；存储值损坏返回 `Err`。
    pub fn verify(&self, plaintext: impl AsRef<[u8]>, stored: &str) -> HasherResult<bool> {
        let plaintext = plaintext.as_ref();
        let span = credential_span("verify");
        let _enter = span.enter();

        let result = if self.settings.use_slow_hash() {
            verify_detailed(plaintext, stored, &self.legacy)
        } else {
            verify_legacy_only(plaintext, stored, &self.legacy)
        };

        match result {
            Ok(verdict) => {
                span.record("scheme", verdict.scheme);
                span.record("success", verdict.matched);
                if verdict.scheme == "unusable" {
                    self.equalize_timing(plaintext);
                }
                observability::record_verify(verdict.scheme, verdict.matched);
                Ok(verdict.matched)
            }
            Err(err) => {
                warn!(error = %err, "stored password hash is malformed");
                observability::record_malformed_hash();
                self.equalize_timing(plaintext);
                Err(err)
            }
        }
    }

    /// 设置账户密码，`None` 会把账户标记为不可用
    pub fn set_password<'a, A: CredentialAccount + ?Sized>(
        &self,
        account: &mut A,
        credential: impl Into<Credential<'a>>,
    ) -> HasherResult<()> {
        let hash = self.hash(credential)?;
        account.set_password_hash(hash);
        Ok(())
    }

    pub fn check_password<A: CredentialAccount + ?Sized>(
        &self,
        account: &A,
        plaintext: impl AsRef<[u8]>,
    ) -> HasherResult<bool> {
        self.verify(plaintext, account.password_hash())
    }

    /// 旧格式，或 bcrypt cost 与当前配置不同
    pub fn needs_upgrade(&self, stored: &str) -> bool {
        self.upgrade_source(stored).is_some()
    }

    /// 登录时验证，成功且需要时用当前配置重新哈希
    ///
    /// 旧格式无法批量迁移，只能在用户下次登录、拿到明文时逐个升级。
    pub fn verify_and_upgrade<A: CredentialAccount + ?Sized>(
        &self,
        account: &mut A,
        plaintext: impl AsRef<[u8]>,
    ) -> HasherResult<bool> {
        let plaintext = plaintext.as_ref();
        if !self.check_password(&*account, plaintext)? {
            return Ok(false);
        }

        if let Some(from) = self.upgrade_source(account.password_hash()) {
            info!(from = from, "upgrading stored password hash");
            self.set_password(account, Credential::Plain(plaintext))?;
            observability::record_upgrade(from);
        }
        Ok(true)
    }

    fn upgrade_source(&self, stored: &str) -> Option<&'static str> {
        if !self.settings.use_slow_hash() {
            return None;
        }
        match stored_hash::parse(stored) {
            Ok(ParsedHash::Legacy) => Some("legacy"),
            Ok(ParsedHash::Bcrypt(parts)) if parts.work_factor.get() != self.settings.work_factor() => {
                Some("bcrypt")
            }
            _ => None,
        }
    }

    /// 没有真正计算 bcrypt 的分支也跑一次，避免响应时间暴露账户状态
    fn equalize_timing(&self, plaintext: &[u8]) {
        if !self.settings.use_slow_hash() {
            return;
        }
        if let Ok(work_factor) = WorkFactor::new(self.settings.work_factor()) {
            black_box(stored_hash::compute(
                BcryptVariant::TwoA,
                work_factor,
                &[0u8; SALT_LEN],
                plaintext,
            ));
        }
    }
}
