// ==========================================
// RODDAR 轮胎管理系统 - 引擎层事件发布
// ==========================================
// 职责: 定义车队事件发布 trait,实现依赖倒置
// 说明: Engine 层定义 trait,外层 (UI / 通知) 实现适配器
// 红线: 事件在提交之后发布; 发布失败不回滚
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 车队事件类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetEventType {
    /// 轮胎换位 / X 轮换
    TiresRotated,
    /// 行程开始
    TripStarted,
    /// 行程完成 (里程已累计)
    TripCompleted,
    /// 轮胎资料/维护记录/花纹/气压变更
    TireUpdated,
    /// 车辆登记
    TruckRegistered,
}

impl FleetEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            FleetEventType::TiresRotated => "TiresRotated",
            FleetEventType::TripStarted => "TripStarted",
            FleetEventType::TripCompleted => "TripCompleted",
            FleetEventType::TireUpdated => "TireUpdated",
            FleetEventType::TruckRegistered => "TruckRegistered",
        }
    }
}

/// 车队事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetEvent {
    pub truck_id: String,
    pub event_type: FleetEventType,
    /// 受影响的轮胎 (空表示整车)
    pub affected_tires: Vec<String>,
    /// 事件来源描述
    pub source: Option<String>,
}

impl FleetEvent {
    /// 整车事件
    pub fn truck_wide(truck_id: impl Into<String>, event_type: FleetEventType) -> Self {
        Self {
            truck_id: truck_id.into(),
            event_type,
            affected_tires: Vec::new(),
            source: None,
        }
    }

    /// 指定轮胎的事件
    pub fn for_tires(
        truck_id: impl Into<String>,
        event_type: FleetEventType,
        tires: Vec<String>,
    ) -> Self {
        Self {
            truck_id: truck_id.into(),
            event_type,
            affected_tires: tires,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_truck_wide(&self) -> bool {
        self.affected_tires.is_empty()
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 车队事件发布者
///
/// # 返回
/// - `Ok(id)`: 下游分配的ID（如果支持）或空字符串
/// - `Err`: 发布失败 (调用方只记录日志)
pub trait FleetEventPublisher: Send + Sync {
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl FleetEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - truck_id={}, event_type={}",
            event.truck_id,
            event.event_type.as_str()
        );
        Ok(String::new())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn FleetEventPublisher>> 的使用
#[derive(Clone)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn FleetEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn FleetEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: 未配置发布者,跳过事件 - truck_id={}, event_type={}",
                    event.truck_id,
                    event.event_type.as_str()
                );
                Ok(String::new())
            }
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
