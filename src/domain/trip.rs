// ==========================================
// RODDAR 轮胎管理系统 - 行程领域模型
// ==========================================
// 红线: 每辆车同一时刻最多一个 ACTIVE 行程
// ==========================================

use crate::domain::types::TripStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Trip - 行程
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,                     // 计划里程 (> 0)
    pub start_at: NaiveDateTime,              // 出发时间
    pub planned_arrival_at: NaiveDateTime,    // 预计到达
    pub completed_at: Option<NaiveDateTime>,  // 实际完成
    pub status: TripStatus,
}

impl Trip {
    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }
}

// ==========================================
// TripDraft - 新行程表单
// ==========================================
// 时间字段为 Option,以便在 start_trip 校验"必填"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub start_at: Option<NaiveDateTime>,
    pub planned_arrival_at: Option<NaiveDateTime>,
}

// ==========================================
// TripPatch - 进行中行程的可编辑字段
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripPatch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub distance_km: Option<f64>,
}
