// ==========================================
// RODDAR 轮胎管理系统 - 应用层
// ==========================================
// 职责: 组装仓储/引擎/API,提供应用入口所需的共享状态
// ==========================================

pub mod demo;
pub mod state;

// 重导出
pub use demo::demo_truck;
pub use state::{get_default_config_path, AppState};
