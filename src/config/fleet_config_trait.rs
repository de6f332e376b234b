// ==========================================
// RODDAR 轮胎管理系统 - 车队配置读取 Trait
// ==========================================
// 职责: 定义引擎/API 所需的配置读取接口（不包含实现）
// 实现者: ConfigManager
// ==========================================

use crate::config::status_thresholds::StatusThresholds;
use std::error::Error;

pub trait FleetConfigReader: Send + Sync {
    /// 获取轮胎状态判定阈值
    ///
    /// # 默认值
    /// - StatusThresholds::default()
    fn get_status_thresholds(&self) -> Result<StatusThresholds, Box<dyn Error>>;

    /// 获取 X 轮换的备用轴序号（无驱动轴时使用,0 起）
    ///
    /// # 默认值
    /// - 1
    fn get_rotation_fallback_axle_index(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取外部能力调用超时（毫秒）
    ///
    /// # 默认值
    /// - 15000
    fn get_external_timeout_ms(&self) -> Result<u64, Box<dyn Error>>;

    /// 获取默认操作人
    ///
    /// # 默认值
    /// - "driver"
    fn get_default_actor(&self) -> Result<String, Box<dyn Error>>;
}
