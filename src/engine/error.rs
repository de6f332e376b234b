// ==========================================
// RODDAR 轮胎管理系统 - 引擎层错误类型
// ==========================================
// 红线: 引擎返回错误时,输入快照保持原样 (无部分写入)
// 说明: 轮胎ID找不到不是错误,由各引擎以"未生效"结果返回
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 输入校验失败 (缺少必填字段 / 数值非法 / 车轴形态不符)
    #[error("数据验证失败: {0}")]
    Validation(String),

    /// 状态机不允许的转换
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
