// ==========================================
// RODDAR 轮胎管理系统 - 车辆登记引擎
// ==========================================
// 职责: 按车轴布局生成车辆、车轴、轮胎、备胎
// 命名: 车轴 axle-{n} (1 起); 轮胎 PNEU-{轴序}-{位序}; 备胎 STP-{序号} (0 起)
// 红线: 生成后整车重算状态,状态一律由规则派生
// ==========================================

use crate::domain::position::{slot_label, spare_label};
use crate::domain::tire::{Tire, DEFAULT_NEW_TREAD_MM};
use crate::domain::truck::{Axle, Owner, Truck};
use crate::domain::types::{AxleType, TireStatus};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::tire_status::TireStatusEngine;
use crate::engine::trip::{required_label, validate_distance};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use std::collections::HashSet;
use uuid::Uuid;

/// 未指定品牌时使用
pub const GENERIC_BRAND: &str = "Generic";

// ==========================================
// 登记表单
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxleLayout {
    pub axle_type: AxleType,
    pub dual: bool, // true = 4 位, false = 2 位
}

impl AxleLayout {
    pub fn single(axle_type: AxleType) -> Self {
        Self { axle_type, dual: false }
    }

    pub fn dual(axle_type: AxleType) -> Self {
        Self { axle_type, dual: true }
    }

    pub fn slot_count(&self) -> usize {
        if self.dual {
            4
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpareSpec {
    pub brand: String,
    pub status: TireStatus, // 声明状态,用于推定初始花纹深度
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TruckRegistration {
    #[serde(default)]
    pub id: Option<String>,
    pub plate: String,
    pub model: String,
    pub total_km: f64,
    #[serde(default)]
    pub owner: Option<Owner>,
    pub axles: Vec<AxleLayout>,
    #[serde(default)]
    pub spares: Vec<SpareSpec>,
}

/// 车辆资料修改 (均为可选)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TruckSettings {
    pub plate: Option<String>,
    pub model: Option<String>,
    pub total_km: Option<f64>,
}

/// 按声明状态推定备胎初始花纹深度
///
/// 取值保证规则判定结果与声明一致 (WARNING 无规则,落在 GOOD 区间)
pub fn seed_tread_depth(status: TireStatus) -> f64 {
    match status {
        TireStatus::New => DEFAULT_NEW_TREAD_MM,
        TireStatus::Good => 7.0,
        TireStatus::Warning => 5.0,
        TireStatus::Critical => 2.0,
    }
}

// ==========================================
// OnboardingEngine - 车辆登记引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct OnboardingEngine {
    status_engine: TireStatusEngine,
}

impl OnboardingEngine {
    pub fn new(status_engine: TireStatusEngine) -> Self {
        Self { status_engine }
    }

    /// 登记车辆
    #[instrument(skip(self, registration), fields(plate = %registration.plate))]
    pub fn register(&self, registration: &TruckRegistration) -> EngineResult<Truck> {
        let plate = registration.plate.trim().to_uppercase();
        if plate.is_empty() {
            return Err(EngineError::Validation("车牌不能为空".to_string()));
        }
        let model = registration.model.trim();
        if model.is_empty() {
            return Err(EngineError::Validation("车型不能为空".to_string()));
        }
        if !registration.total_km.is_finite() || registration.total_km < 0.0 {
            return Err(EngineError::Validation(format!(
                "里程表必须为非负数: total_km={}",
                registration.total_km
            )));
        }
        if registration.axles.is_empty() {
            return Err(EngineError::Validation("至少需要一根车轴".to_string()));
        }

        let id = registration
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut truck = Truck::new(id, plate, model).with_total_km(registration.total_km);
        truck.owner = registration.owner.clone();

        for (axle_index, layout) in registration.axles.iter().enumerate() {
            let slot_count = layout.slot_count();
            let tires = (0..slot_count)
                .map(|slot_index| {
                    let mut tire = Tire::new(format!("PNEU-{}-{}", axle_index, slot_index), GENERIC_BRAND);
                    tire.position = slot_label(slot_index, slot_count);
                    tire
                })
                .collect();
            truck = truck.with_axle(Axle::with_tires(
                format!("axle-{}", axle_index + 1),
                layout.axle_type,
                tires,
            ));
        }

        for (spare_index, spec) in registration.spares.iter().enumerate() {
            let brand = match spec.brand.trim() {
                "" => GENERIC_BRAND,
                brand => brand,
            };
            let mut tire = Tire::new(format!("STP-{}", spare_index), brand)
                .with_tread_depth(seed_tread_depth(spec.status));
            tire.position = spare_label(spare_index);
            truck = truck.with_spare(tire);
        }

        let (truck, _) = self.status_engine.reclassify_truck(&truck);
        tracing::info!(
            "车辆登记完成: truck_id={}, axles={}, tires={}",
            truck.id,
            truck.axles.len(),
            truck.all_tires().count()
        );
        Ok(truck)
    }

    /// 修改车牌 / 车型 / 里程表
    pub fn update_settings(&self, truck: &Truck, settings: &TruckSettings) -> EngineResult<Truck> {
        let mut next = truck.clone();
        if let Some(plate) = &settings.plate {
            let plate = plate.trim().to_uppercase();
            if plate.is_empty() {
                return Err(EngineError::Validation("车牌不能为空".to_string()));
            }
            next.plate = plate;
        }
        if let Some(model) = &settings.model {
            let model = model.trim();
            if model.is_empty() {
                return Err(EngineError::Validation("车型不能为空".to_string()));
            }
            next.model = model.to_string();
        }
        if let Some(total_km) = settings.total_km {
            if !total_km.is_finite() || total_km < 0.0 {
                return Err(EngineError::Validation(format!(
                    "里程表必须为非负数: total_km={}",
                    total_km
                )));
            }
            next.total_km = total_km;
        }
        Ok(next)
    }

    /// 修改车主资料
    pub fn update_owner(&self, truck: &Truck, owner: &Owner) -> EngineResult<Truck> {
        if owner.name.trim().is_empty() {
            return Err(EngineError::Validation("车主名称不能为空".to_string()));
        }
        if owner.email.as_deref().is_some_and(|e| !e.trim().is_empty() && !e.contains('@')) {
            return Err(EngineError::Validation(format!(
                "邮箱格式错误: {}",
                owner.email.as_deref().unwrap_or_default()
            )));
        }
        let mut next = truck.clone();
        next.owner = Some(owner.clone());
        Ok(next)
    }

    /// 校验外部车辆快照 (导入前)
    ///
    /// 规则:
    /// - 里程表有限且 >= 0
    /// - 进行中行程: 起止地非空、距离 > 0、预计到达不早于出发
    /// - 每个轮胎: 0 <= initial_km <= current_km, 花纹深度有限且 >= 0
    /// - 同一车辆内轮胎ID唯一 (轴位 + 备胎)
    pub fn validate_snapshot(&self, truck: &Truck) -> EngineResult<()> {
        if !truck.total_km.is_finite() || truck.total_km < 0.0 {
            return Err(EngineError::Validation(format!(
                "累计里程不能为负: total_km={}",
                truck.total_km
            )));
        }

        if let Some(trip) = truck.active_trip.as_ref() {
            required_label("origin", &trip.origin)?;
            required_label("destination", &trip.destination)?;
            validate_distance(trip.distance_km)?;
            if trip.planned_arrival_at < trip.start_at {
                return Err(EngineError::Validation(format!(
                    "预计到达时间早于出发时间: trip_id={}",
                    trip.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for tire in truck.all_tires() {
            if !seen.insert(tire.id.as_str()) {
                return Err(EngineError::Validation(format!("轮胎ID重复: {}", tire.id)));
            }
            if !tire.initial_km.is_finite() || tire.initial_km < 0.0 {
                return Err(EngineError::Validation(format!(
                    "初始里程不能为负: tire_id={}, initial_km={}",
                    tire.id, tire.initial_km
                )));
            }
            if !tire.current_km.is_finite() || tire.current_km < tire.initial_km {
                return Err(EngineError::Validation(format!(
                    "当前里程小于初始里程: tire_id={}, initial_km={}, current_km={}",
                    tire.id, tire.initial_km, tire.current_km
                )));
            }
            if !tire.tread_depth_mm.is_finite() || tire.tread_depth_mm < 0.0 {
                return Err(EngineError::Validation(format!(
                    "花纹深度无效: tire_id={}, tread_depth_mm={}",
                    tire.id, tire.tread_depth_mm
                )));
            }
        }
        Ok(())
    }
}
