// ==========================================
// RODDAR 轮胎管理系统 - 操作日志领域模型
// ==========================================
// 红线: 所有已提交的写操作必须记录; 软性空操作不记录
// 用途: 审计追踪
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,              // 日志ID
    pub truck_id: String,               // 关联车辆
    pub action_type: ActionType,        // 操作类型
    pub action_ts: NaiveDateTime,       // 操作时间
    pub actor: String,                  // 操作人
    pub payload_json: Option<JsonValue>, // 操作参数/结果
    pub detail: Option<String>,         // 可读描述
}

impl ActionLog {
    pub fn new(
        truck_id: impl Into<String>,
        action_type: ActionType,
        actor: impl Into<String>,
        action_ts: NaiveDateTime,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            truck_id: truck_id.into(),
            action_type,
            action_ts,
            actor: actor.into(),
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    RegisterTruck,       // 车辆登记
    UpdateTruckSettings, // 车辆资料修改
    UpdateOwner,         // 车主资料修改
    SwapTires,           // 手动换位
    AutoRotation,        // X 型自动轮换
    RecordOccurrence,    // 登记维护事件
    RecordPressure,      // 气压调整
    ApplyTreadDepth,     // 花纹深度更新
    UpdateTireDetails,   // 轮胎资料修改
    StartTrip,           // 开始行程
    EditTrip,            // 修改行程
    CompleteTrip,        // 完成行程
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::RegisterTruck => "REGISTER_TRUCK",
            ActionType::UpdateTruckSettings => "UPDATE_TRUCK_SETTINGS",
            ActionType::UpdateOwner => "UPDATE_OWNER",
            ActionType::SwapTires => "SWAP_TIRES",
            ActionType::AutoRotation => "AUTO_ROTATION",
            ActionType::RecordOccurrence => "RECORD_OCCURRENCE",
            ActionType::RecordPressure => "RECORD_PRESSURE",
            ActionType::ApplyTreadDepth => "APPLY_TREAD_DEPTH",
            ActionType::UpdateTireDetails => "UPDATE_TIRE_DETAILS",
            ActionType::StartTrip => "START_TRIP",
            ActionType::EditTrip => "EDIT_TRIP",
            ActionType::CompleteTrip => "COMPLETE_TRIP",
        };
        f.write_str(s)
    }
}
