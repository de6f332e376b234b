// ==========================================
// RODDAR 轮胎管理系统 - 操作日志数据仓储
// ==========================================
// 红线: 所有已提交的写操作必须记录
// 存储: 进程内,只追加
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
