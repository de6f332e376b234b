// ==========================================
// RODDAR 轮胎管理系统 - 车队报表引擎
// ==========================================
// 职责: 单车轮胎报表、品牌 CPK、当日轮换判定、车辆上下文摘要
// 红线: 只读; 报表中的状态按规则实时重算,不信任存储值
// ==========================================

use crate::domain::truck::Truck;
use crate::domain::types::{MaintenanceKind, TireStatus};
use crate::engine::locator::TireLocator;
use crate::engine::rotation::{AxleSelector, RotationEngine};
use crate::engine::tire_status::TireStatusEngine;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 报表结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireReportRow {
    pub tire_id: String,
    pub location: String, // "Axle 1 - Left" / "Spare #1"
    pub is_spare: bool,
    pub brand: String,
    pub status: TireStatus,
    pub status_reason: String, // 规则原因 JSON
    pub km_run: f64,
    pub current_km: f64,
    pub tread_depth_mm: f64,
    pub pressure_psi: f64,
    pub retread_count: usize,
    pub cpk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub truck_id: String,
    pub plate: String,
    pub model: String,
    pub total_km: f64,
    pub generated_at: NaiveDateTime,
    pub has_active_trip: bool,
    pub completed_trips: usize,
    pub rotation_applied_today: bool,
    pub status_counts: BTreeMap<TireStatus, usize>,
    pub cpk_by_brand: BTreeMap<String, f64>, // 仅统计已行驶的轮胎
    pub tires: Vec<TireReportRow>,
}

impl FleetReport {
    pub fn count(&self, status: TireStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

// ==========================================
// FleetReportEngine - 报表引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct FleetReportEngine {
    status_engine: TireStatusEngine,
    locator: TireLocator,
    rotation_engine: RotationEngine,
    fallback_axle_index: usize,
}

impl Default for FleetReportEngine {
    fn default() -> Self {
        Self::new(TireStatusEngine::new(), 1)
    }
}

impl FleetReportEngine {
    pub fn new(status_engine: TireStatusEngine, fallback_axle_index: usize) -> Self {
        Self {
            status_engine,
            locator: TireLocator::new(),
            rotation_engine: RotationEngine::new(),
            fallback_axle_index,
        }
    }

    /// 生成单车报表
    pub fn build(&self, truck: &Truck, now: NaiveDateTime) -> FleetReport {
        let mut rows = Vec::new();
        let mut status_counts: BTreeMap<TireStatus, usize> = BTreeMap::new();
        let mut brand_cpk: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for location in self.locator.locate_all(truck) {
            let Some(tire) = truck.tire_at(&location) else {
                continue;
            };
            let (status, reason) = self.status_engine.evaluate(tire);
            *status_counts.entry(status).or_insert(0) += 1;
            if tire.km_run() > 0.0 {
                brand_cpk.entry(tire.brand.clone()).or_default().push(tire.cpk());
            }

            rows.push(TireReportRow {
                tire_id: tire.id.clone(),
                location: location.qualified_label(),
                is_spare: location.is_spare(),
                brand: tire.brand.clone(),
                status,
                status_reason: reason,
                km_run: tire.km_run(),
                current_km: tire.current_km,
                tread_depth_mm: tire.tread_depth_mm,
                pressure_psi: tire.pressure_psi,
                retread_count: tire.retread_count(),
                cpk: tire.cpk(),
            });
        }

        let cpk_by_brand = brand_cpk
            .into_iter()
            .map(|(brand, values)| {
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                (brand, avg)
            })
            .collect();

        FleetReport {
            truck_id: truck.id.clone(),
            plate: truck.plate.clone(),
            model: truck.model.clone(),
            total_km: truck.total_km,
            generated_at: now,
            has_active_trip: truck.has_active_trip(),
            completed_trips: truck.trip_history.len(),
            rotation_applied_today: self.rotation_applied_on(truck, now.date()),
            status_counts,
            cpk_by_brand,
            tires: rows,
        }
    }

    /// 指定日期是否已在 X 轮换轴上做过轮换
    pub fn rotation_applied_on(&self, truck: &Truck, date: NaiveDate) -> bool {
        let selector = AxleSelector::TractionOrFallback(self.fallback_axle_index);
        let Ok(axle_index) = self.rotation_engine.resolve_axle(truck, &selector) else {
            return false;
        };
        truck.axles[axle_index].tires().any(|tire| {
            tire.history()
                .iter()
                .any(|r| r.kind == MaintenanceKind::Rotation && r.recorded_at.date() == date)
        })
    }

    /// 车辆上下文摘要 (供顾问能力使用)
    pub fn truck_context_summary(&self, truck: &Truck) -> String {
        let mut brands: Vec<&str> = truck.all_tires().map(|t| t.brand.as_str()).collect();
        brands.sort_unstable();
        brands.dedup();

        let mut counts: BTreeMap<TireStatus, usize> = BTreeMap::new();
        for tire in truck.all_tires() {
            *counts.entry(self.status_engine.classify(tire)).or_insert(0) += 1;
        }
        let status_text = counts
            .iter()
            .map(|(status, n)| format!("{} {}", status, n))
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            format!(
                "Truck {} ({}), odometer {} km, {} axles.",
                truck.model,
                truck.plate,
                truck.total_km,
                truck.axles.len()
            ),
            format!(
                "Tires: {} installed, {} spare. Brands: {}.",
                truck.installed_tires().count(),
                truck.spare_tires().count(),
                brands.join(", ")
            ),
            format!("Status: {}.", status_text),
        ];

        let critical: Vec<String> = self
            .locator
            .locate_all(truck)
            .into_iter()
            .filter(|loc| {
                truck
                    .tire_at(loc)
                    .is_some_and(|t| self.status_engine.classify(t) == TireStatus::Critical)
            })
            .map(|loc| format!("{} at {}", loc.tire_id, loc.qualified_label()))
            .collect();
        if !critical.is_empty() {
            lines.push(format!("Critical tires: {}.", critical.join("; ")));
        }

        if let Some(trip) = &truck.active_trip {
            lines.push(format!(
                "Active trip: {} → {} ({} km).",
                trip.origin, trip.destination, trip.distance_km
            ));
        }

        lines.join("\n")
    }
}
