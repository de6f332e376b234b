// ==========================================
// RODDAR 轮胎管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不做存储
// 红线: 引擎是纯变换: 输入旧快照,输出新快照
// 红线: 状态判定必须输出 reason
// ==========================================

pub mod error;
pub mod events;
pub mod locator;
pub mod maintenance;
pub mod onboarding;
pub mod report;
pub mod rotation;
pub mod tire_status;
pub mod trip;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use events::{
    FleetEvent, FleetEventPublisher, FleetEventType, NoOpEventPublisher, OptionalEventPublisher,
};
pub use locator::{SlotOption, TireLocator};
pub use maintenance::{MaintenanceEngine, TireUpdateOutcome};
pub use onboarding::{AxleLayout, OnboardingEngine, SpareSpec, TruckRegistration, TruckSettings};
pub use report::{FleetReport, FleetReportEngine, TireReportRow};
pub use rotation::{AxleSelector, RotationEngine, RotationOutcome, TireMove};
pub use tire_status::{StatusChange, TireStatusEngine};
pub use trip::{TripCompletion, TripEngine, TripState};
