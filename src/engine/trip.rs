// ==========================================
// RODDAR 轮胎管理系统 - 行程引擎
// ==========================================
// 状态机: NO_ACTIVE_TRIP ⇄ TRIP_ACTIVE
// 红线: 每辆车同时最多一个进行中行程
// 红线: 完成行程整体生效 (里程表 + 在装轮胎里程 + 状态重算 + 历史)
// 红线: 备胎不累计里程
// ==========================================

use crate::domain::trip::{Trip, TripDraft, TripPatch};
use crate::domain::truck::Truck;
use crate::domain::types::TripStatus;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::tire_status::{StatusChange, TireStatusEngine};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// TripState - 车辆行程状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripState {
    NoActiveTrip,
    TripActive,
}

impl TripState {
    pub fn of(truck: &Truck) -> Self {
        if truck.has_active_trip() {
            TripState::TripActive
        } else {
            TripState::NoActiveTrip
        }
    }
}

impl fmt::Display for TripState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripState::NoActiveTrip => write!(f, "NO_ACTIVE_TRIP"),
            TripState::TripActive => write!(f, "TRIP_ACTIVE"),
        }
    }
}

// ==========================================
// TripCompletion - 完成行程结果
// ==========================================
#[derive(Debug, Clone)]
pub struct TripCompletion {
    pub truck: Truck,
    pub trip: Trip,                        // 已完成的行程
    pub status_changes: Vec<StatusChange>, // 因里程累计产生的状态变化
}

// ==========================================
// TripEngine - 行程引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TripEngine {
    status_engine: TireStatusEngine,
}

impl TripEngine {
    pub fn new(status_engine: TireStatusEngine) -> Self {
        Self { status_engine }
    }

    /// 开始行程
    ///
    /// 仅允许 NO_ACTIVE_TRIP; 起止地非空、距离 > 0、出发/到达时间必填
    pub fn start_trip(&self, truck: &Truck, draft: &TripDraft) -> EngineResult<Truck> {
        let state = TripState::of(truck);
        if state != TripState::NoActiveTrip {
            return Err(EngineError::InvalidStateTransition {
                from: state.to_string(),
                to: TripState::TripActive.to_string(),
            });
        }

        let origin = required_label("origin", &draft.origin)?;
        let destination = required_label("destination", &draft.destination)?;
        validate_distance(draft.distance_km)?;
        let start_at = draft
            .start_at
            .ok_or_else(|| EngineError::Validation("缺少出发时间 start_at".to_string()))?;
        let planned_arrival_at = draft
            .planned_arrival_at
            .ok_or_else(|| EngineError::Validation("缺少预计到达时间 planned_arrival_at".to_string()))?;
        if planned_arrival_at < start_at {
            return Err(EngineError::Validation(format!(
                "预计到达时间早于出发时间: start_at={}, planned_arrival_at={}",
                start_at, planned_arrival_at
            )));
        }

        let trip = Trip {
            id: draft
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            origin,
            destination,
            distance_km: draft.distance_km,
            start_at,
            planned_arrival_at,
            completed_at: None,
            status: TripStatus::Active,
        };

        let mut next = truck.clone();
        next.active_trip = Some(trip);
        Ok(next)
    }

    /// 修改进行中行程 (起点 / 终点 / 距离)
    pub fn edit_active_trip(&self, truck: &Truck, patch: &TripPatch) -> EngineResult<Truck> {
        let Some(active) = truck.active_trip.as_ref() else {
            return Err(EngineError::InvalidStateTransition {
                from: TripState::NoActiveTrip.to_string(),
                to: "EDIT_ACTIVE_TRIP".to_string(),
            });
        };

        let mut trip = active.clone();
        if let Some(origin) = &patch.origin {
            trip.origin = required_label("origin", origin)?;
        }
        if let Some(destination) = &patch.destination {
            trip.destination = required_label("destination", destination)?;
        }
        if let Some(distance_km) = patch.distance_km {
            validate_distance(distance_km)?;
            trip.distance_km = distance_km;
        }

        let mut next = truck.clone();
        next.active_trip = Some(trip);
        Ok(next)
    }

    /// 完成行程
    ///
    /// 步骤（一次性生效）:
    /// 1) 车辆里程表 += 行程距离
    /// 2) 每个在装轮胎 current_km += 行程距离,并重算状态 (备胎不变)
    /// 3) 行程标记 COMPLETED,写入完成时间,插入历史最前
    /// 4) 清空进行中行程
    #[instrument(skip(self, truck), fields(truck_id = %truck.id))]
    pub fn complete_trip(&self, truck: &Truck, now: NaiveDateTime) -> EngineResult<TripCompletion> {
        let Some(active) = truck.active_trip.as_ref() else {
            return Err(EngineError::InvalidStateTransition {
                from: TripState::NoActiveTrip.to_string(),
                to: "COMPLETE_TRIP".to_string(),
            });
        };
        let distance = active.distance_km;

        let mut next = truck.clone();
        next.total_km += distance;

        let mut status_changes = Vec::new();
        for axle in next.axles.iter_mut() {
            if axle.tires().next().is_none() {
                continue;
            }
            let axle = Arc::make_mut(axle);
            for tire in axle.slots.iter_mut().flatten() {
                let tire = Arc::make_mut(tire);
                tire.current_km += distance;
                status_changes.extend(self.status_engine.reclassify(tire));
            }
        }

        let mut trip = active.clone();
        trip.status = TripStatus::Completed;
        trip.completed_at = Some(now);
        Arc::make_mut(&mut next.trip_history).insert(0, trip.clone());
        next.active_trip = None;

        tracing::info!(
            "行程完成: trip_id={}, distance_km={}, total_km={}, status_changes={}",
            trip.id,
            distance,
            next.total_km,
            status_changes.len()
        );

        Ok(TripCompletion {
            truck: next,
            trip,
            status_changes,
        })
    }
}

pub(crate) fn required_label(field: &str, value: &str) -> EngineResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EngineError::Validation(format!("{} 不能为空", field)));
    }
    Ok(value.to_string())
}

pub(crate) fn validate_distance(distance_km: f64) -> EngineResult<()> {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Err(EngineError::Validation(format!(
            "行程距离必须大于 0: distance_km={}",
            distance_km
        )));
    }
    Ok(())
}
