// ==========================================
// RODDAR 轮胎管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 进程内车辆快照存储 + 操作日志
// 约束: 不做持久化
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod fleet_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use fleet_repo::FleetRepository;
