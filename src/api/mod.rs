// ==========================================
// RODDAR 轮胎管理系统 - API 层
// ==========================================
// 职责: 提供业务用例接口,供 CLI / UI 调用
// ==========================================

pub mod error;
pub mod external;
pub mod fleet_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use external::{
    Advisor, DistanceEstimator, ExternalApi, TireImage, TreadDepthEstimate, TreadDepthEstimator,
};
pub use fleet_api::FleetApi;
