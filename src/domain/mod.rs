// ==========================================
// RODDAR 轮胎管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、轮位寻址
// 红线: 不含存储逻辑,不含引擎规则
// ==========================================

pub mod action_log;
pub mod position;
pub mod tire;
pub mod trip;
pub mod truck;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use position::{slot_label, spare_label, TireContainer, TireLocation};
pub use tire::{MaintenanceRecord, Tire, TirePatch};
pub use trip::{Trip, TripDraft, TripPatch};
pub use truck::{Axle, Owner, Truck};
pub use types::{AxleType, MaintenanceKind, TireStatus, TripStatus};
