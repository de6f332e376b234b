// ==========================================
// RODDAR 轮胎管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件加载与运行期覆写
// ==========================================

pub mod config_manager;
pub mod fleet_config_trait;
pub mod status_thresholds;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use fleet_config_trait::FleetConfigReader;
pub use status_thresholds::StatusThresholds;
