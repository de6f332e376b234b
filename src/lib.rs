// ==========================================
// RODDAR 轮胎管理系统 - 核心库
// ==========================================
// 范围: 单车轮胎台账 (状态判定 / 轮位定位 / 轮换 / 行程里程)
// 系统定位: 记录与建议系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 进程内车辆快照与操作日志
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AxleType, MaintenanceKind, TireStatus, TripStatus};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Axle, MaintenanceRecord, Owner, Tire, TireLocation, Trip, TripDraft,
    Truck,
};

// 引擎
pub use engine::{
    FleetReportEngine, MaintenanceEngine, OnboardingEngine, RotationEngine, TireLocator,
    TireStatusEngine, TripEngine,
};

// API
pub use api::{ApiError, ApiResult, ExternalApi, FleetApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "RODDAR 轮胎管理系统";
