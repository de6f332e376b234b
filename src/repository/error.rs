// ==========================================
// RODDAR 轮胎管理系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::engine::error::EngineError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 存储错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // ===== 业务规则错误 (来自引擎,原样透传) =====
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// update 闭包内的引擎错误
impl From<EngineError> for RepositoryError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => RepositoryError::ValidationError(msg),
            EngineError::InvalidStateTransition { from, to } => {
                RepositoryError::InvalidStateTransition { from, to }
            }
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
