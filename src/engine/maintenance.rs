// ==========================================
// RODDAR 轮胎管理系统 - 维护引擎
// ==========================================
// 职责: 登记事件、气压调整、花纹深度、轮胎资料修改
// 红线: 每次修改后必须重算状态
// 红线: 轮胎找不到 → 空操作 (applied=false),不报错
// 红线: 校验失败不产生任何修改
// ==========================================

use crate::domain::tire::{MaintenanceRecord, Tire, TirePatch};
use crate::domain::truck::Truck;
use crate::domain::types::MaintenanceKind;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::locator::TireLocator;
use crate::engine::tire_status::{StatusChange, TireStatusEngine};
use chrono::NaiveDateTime;

// ==========================================
// TireUpdateOutcome - 单胎修改结果
// ==========================================
#[derive(Debug, Clone)]
pub struct TireUpdateOutcome {
    pub truck: Truck,
    pub tire_id: String,
    pub applied: bool,                       // false = 轮胎未找到
    pub record: Option<MaintenanceRecord>,   // 本次追加的记录
    pub status_change: Option<StatusChange>, // 重算后的状态变化
}

// ==========================================
// MaintenanceEngine - 维护引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MaintenanceEngine {
    locator: TireLocator,
    status_engine: TireStatusEngine,
}

impl MaintenanceEngine {
    pub fn new(status_engine: TireStatusEngine) -> Self {
        Self {
            locator: TireLocator::new(),
            status_engine,
        }
    }

    /// 登记维护事件 (扎胎 / 鼓包 / 翻新 / 爆胎 ...)
    ///
    /// ROTATION 只能由轮换引擎产生
    pub fn record_occurrence(
        &self,
        truck: &Truck,
        tire_id: &str,
        kind: MaintenanceKind,
        description: &str,
        cost: f64,
        at: NaiveDateTime,
    ) -> EngineResult<TireUpdateOutcome> {
        if kind == MaintenanceKind::Rotation {
            return Err(EngineError::Validation(
                "ROTATION 记录只能由轮换操作产生".to_string(),
            ));
        }
        validate_non_negative("cost", cost)?;

        self.mutate_tire(truck, tire_id, |_| {
            Ok(Some(MaintenanceRecord::new(kind, description.trim(), cost, at)))
        })
    }

    /// 气压调整
    pub fn record_pressure(
        &self,
        truck: &Truck,
        tire_id: &str,
        pressure_psi: f64,
        at: NaiveDateTime,
    ) -> EngineResult<TireUpdateOutcome> {
        if !pressure_psi.is_finite() || pressure_psi <= 0.0 {
            return Err(EngineError::Validation(format!(
                "胎压必须大于 0: pressure_psi={}",
                pressure_psi
            )));
        }

        self.mutate_tire(truck, tire_id, |tire| {
            tire.pressure_psi = pressure_psi;
            Ok(Some(MaintenanceRecord::new(
                MaintenanceKind::Pressure,
                format!("Pressure adjusted to {} PSI", pressure_psi),
                0.0,
                at,
            )))
        })
    }

    /// 更新花纹深度 (人工测量或外部估算)
    pub fn apply_tread_depth(
        &self,
        truck: &Truck,
        tire_id: &str,
        tread_depth_mm: f64,
    ) -> EngineResult<TireUpdateOutcome> {
        validate_non_negative("tread_depth_mm", tread_depth_mm)?;

        self.mutate_tire(truck, tire_id, |tire| {
            tire.tread_depth_mm = tread_depth_mm;
            Ok(None)
        })
    }

    /// 修改轮胎资料
    ///
    /// current_km 只能增加,且不小于 initial_km
    pub fn update_tire_details(
        &self,
        truck: &Truck,
        tire_id: &str,
        patch: &TirePatch,
    ) -> EngineResult<TireUpdateOutcome> {
        if let Some(price) = patch.purchase_price {
            validate_non_negative("purchase_price", price)?;
        }
        if let Some(km) = patch.current_km {
            validate_non_negative("current_km", km)?;
        }
        if patch.brand.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(EngineError::Validation("brand 不能为空".to_string()));
        }

        self.mutate_tire(truck, tire_id, |tire| {
            if let Some(km) = patch.current_km {
                if km < tire.initial_km {
                    return Err(EngineError::Validation(format!(
                        "current_km 不能小于 initial_km: current_km={}, initial_km={}",
                        km, tire.initial_km
                    )));
                }
                if km < tire.current_km {
                    return Err(EngineError::Validation(format!(
                        "current_km 不能减少: {} → {}",
                        tire.current_km, km
                    )));
                }
                tire.current_km = km;
            }
            if let Some(brand) = &patch.brand {
                tire.brand = brand.trim().to_string();
            }
            if let Some(model) = &patch.model {
                tire.model = model.trim().to_string();
            }
            if let Some(dot) = &patch.dot {
                tire.dot = dot.trim().to_string();
            }
            if let Some(size) = &patch.size {
                tire.size = size.trim().to_string();
            }
            if let Some(price) = patch.purchase_price {
                tire.purchase_price = price;
            }
            Ok(None)
        })
    }

    /// 定位 → 在副本上修改 → 重算状态
    ///
    /// 闭包返回错误时丢弃副本
    fn mutate_tire<F>(&self, truck: &Truck, tire_id: &str, f: F) -> EngineResult<TireUpdateOutcome>
    where
        F: FnOnce(&mut Tire) -> EngineResult<Option<MaintenanceRecord>>,
    {
        let unchanged = || TireUpdateOutcome {
            truck: truck.clone(),
            tire_id: tire_id.to_string(),
            applied: false,
            record: None,
            status_change: None,
        };

        let Some(location) = self.locator.locate(truck, tire_id) else {
            tracing::debug!("轮胎未找到,跳过: truck_id={}, tire_id={}", truck.id, tire_id);
            return Ok(unchanged());
        };

        let mut next = truck.clone();
        let Some(tire) = next.tire_mut(&location) else {
            return Ok(unchanged());
        };

        let record = f(tire)?;
        if let Some(record) = &record {
            tire.push_record(record.clone());
        }
        let status_change = self.status_engine.reclassify(tire);

        Ok(TireUpdateOutcome {
            truck: next,
            tire_id: tire_id.to_string(),
            applied: true,
            record,
            status_change,
        })
    }
}

fn validate_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::Validation(format!(
            "{} 必须为非负数: {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::truck::Axle;
    use crate::domain::types::{AxleType, TireStatus};
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 20)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn truck() -> Truck {
        Truck::new("truck-01", "HUE-2024", "Volvo FH 540")
            .with_axle(Axle::with_tires(
                "axle-1",
                AxleType::Front,
                vec![
                    Tire::new("FIRE-001", "Michelin").with_km(1_000.0, 20_000.0),
                    Tire::new("FIRE-002", "Michelin"),
                ],
            ))
            .with_spare(Tire::new("STP-001", "Goodyear"))
    }

    fn tire<'a>(truck: &'a Truck, id: &str) -> &'a Tire {
        TireLocator::new().find_tire(truck, id).unwrap()
    }

    #[test]
    fn test_scenario_1_blowout_makes_critical() {
        let engine = MaintenanceEngine::default();
        let outcome = engine
            .record_occurrence(&truck(), "FIRE-001", MaintenanceKind::Blowout, "BR-116", 0.0, at())
            .unwrap();

        assert!(outcome.applied);
        let t = tire(&outcome.truck, "FIRE-001");
        assert_eq!(t.status, TireStatus::Critical);
        assert_eq!(t.last_record().unwrap().kind, MaintenanceKind::Blowout);
        assert_eq!(outcome.status_change.unwrap().to, TireStatus::Critical);
    }

    #[test]
    fn test_scenario_2_occurrence_on_spare() {
        let engine = MaintenanceEngine::default();
        let outcome = engine
            .record_occurrence(&truck(), "STP-001", MaintenanceKind::Retread, "1ª recapagem", 900.0, at())
            .unwrap();
        let t = tire(&outcome.truck, "STP-001");
        assert_eq!(t.status, TireStatus::Good);
        assert_eq!(t.last_record().unwrap().cost, 900.0);
    }

    #[test]
    fn test_scenario_3_rotation_kind_rejected() {
        let engine = MaintenanceEngine::default();
        let result =
            engine.record_occurrence(&truck(), "FIRE-001", MaintenanceKind::Rotation, "", 0.0, at());
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_scenario_4_unknown_tire_is_noop() {
        let engine = MaintenanceEngine::default();
        let before = truck();
        let outcome = engine.apply_tread_depth(&before, "FIRE-999", 5.0).unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.truck, before);
    }

    #[test]
    fn test_scenario_5_tread_depth_reclassifies() {
        let engine = MaintenanceEngine::default();
        let outcome = engine.apply_tread_depth(&truck(), "FIRE-002", 2.5).unwrap();
        assert_eq!(tire(&outcome.truck, "FIRE-002").status, TireStatus::Critical);
        assert!(outcome.record.is_none());

        assert!(engine.apply_tread_depth(&truck(), "FIRE-002", -1.0).is_err());
        assert!(engine.apply_tread_depth(&truck(), "FIRE-002", f64::NAN).is_err());
    }

    #[test]
    fn test_scenario_6_pressure_record() {
        let engine = MaintenanceEngine::default();
        let outcome = engine.record_pressure(&truck(), "FIRE-002", 115.0, at()).unwrap();
        let t = tire(&outcome.truck, "FIRE-002");
        assert_eq!(t.pressure_psi, 115.0);
        assert_eq!(t.last_record().unwrap().kind, MaintenanceKind::Pressure);
        assert_eq!(t.status, TireStatus::New);

        assert!(engine.record_pressure(&truck(), "FIRE-002", 0.0, at()).is_err());
    }

    #[test]
    fn test_scenario_7_update_details() {
        let engine = MaintenanceEngine::default();
        let patch = TirePatch {
            brand: Some("Pirelli".to_string()),
            current_km: Some(45_000.0),
            purchase_price: Some(2_500.0),
            ..Default::default()
        };
        let outcome = engine.update_tire_details(&truck(), "FIRE-001", &patch).unwrap();
        let t = tire(&outcome.truck, "FIRE-001");
        assert_eq!(t.brand, "Pirelli");
        assert_eq!(t.current_km, 45_000.0);
        assert_eq!(t.purchase_price, 2_500.0);
        // 44000 km 已跑 → GOOD
        assert_eq!(t.status, TireStatus::Good);
    }

    #[test]
    fn test_scenario_8_current_km_guards() {
        let engine = MaintenanceEngine::default();
        let before = truck();

        let below_initial = TirePatch {
            current_km: Some(500.0),
            ..Default::default()
        };
        assert!(engine.update_tire_details(&before, "FIRE-001", &below_initial).is_err());

        let decreasing = TirePatch {
            current_km: Some(19_000.0),
            ..Default::default()
        };
        assert!(engine.update_tire_details(&before, "FIRE-001", &decreasing).is_err());

        // 失败不影响原快照
        assert_eq!(tire(&before, "FIRE-001").current_km, 20_000.0);
    }

    #[test]
    fn test_scenario_9_blank_brand_rejected() {
        let engine = MaintenanceEngine::default();
        let patch = TirePatch {
            brand: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(engine.update_tire_details(&truck(), "FIRE-001", &patch).is_err());
    }
}
