//! bcrypt 工作因子

use std::fmt;

use crate::error::{HasherError, HasherResult};

/// 最小 cost，低于此值 bcrypt 没有意义
pub const MIN_WORK_FACTOR: u32 = 4;
/// 新哈希允许的最大 cost，再往上单次哈希要以分钟计
pub const MAX_WORK_FACTOR: u32 = 20;
/// 存储值可接受的最大 cost，超过的按损坏处理，不去计算
pub const MAX_STORED_WORK_FACTOR: u32 = 24;
pub const DEFAULT_WORK_FACTOR: u32 = 12;

/// 已校验的工作因子（log2 迭代次数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkFactor(u32);

impl WorkFactor {
    pub fn new(value: u32) -> HasherResult<Self> {
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&value) {
            return Err(HasherError::Configuration {
                value,
                min: MIN_WORK_FACTOR,
                max: MAX_WORK_FACTOR,
            });
        }
        Ok(Self(value))
    }

    /// 解析存储值里的 cost，上限比 [`WorkFactor::new`] 宽
    pub(crate) fn from_stored(value: u32) -> Option<Self> {
        (MIN_WORK_FACTOR..=MAX_STORED_WORK_FACTOR)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self(DEFAULT_WORK_FACTOR)
    }
}

impl TryFrom<u32> for WorkFactor {
    type Error = HasherError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for WorkFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
