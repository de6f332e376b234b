// ==========================================
// RODDAR 轮胎管理系统 - 轮换引擎
// ==========================================
// 职责: 手动换位 (任意两胎互换) + X 型自动轮换 (4 位轴)
// 红线: 整体提交或不变; 返回新快照,旧快照保持有效
// 红线: 每个被移动的轮胎追加一条 ROTATION 记录,同一次操作时间戳一致
// 红线: 轮换不触发状态重算
// ==========================================

use crate::domain::position::TireLocation;
use crate::domain::tire::MaintenanceRecord;
use crate::domain::truck::Truck;
use crate::domain::types::{AxleType, MaintenanceKind};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::locator::TireLocator;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// X 型交叉: (原轮位, 新轮位)
///
/// 外左 ↔ 内右, 内左 ↔ 外右
const X_PATTERN: [(usize, usize); 4] = [(0, 2), (2, 0), (1, 3), (3, 1)];

// ==========================================
// AxleSelector - X 轮换选轴方式
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxleSelector {
    /// 优先驱动轴,没有则用给定轴序号 (0 起)
    TractionOrFallback(usize),
    /// 指定轴序号 (0 起)
    Index(usize),
    /// 指定轴ID
    Id(String),
}

// ==========================================
// TireMove / RotationOutcome
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TireMove {
    pub tire_id: String,
    pub from: TireLocation,
    pub to: TireLocation,
    pub record_id: String, // 追加的 ROTATION 记录ID
}

#[derive(Debug, Clone)]
pub struct RotationOutcome {
    pub truck: Truck,
    pub moves: Vec<TireMove>,
    pub rotated_at: NaiveDateTime,
}

impl RotationOutcome {
    fn unchanged(truck: &Truck, rotated_at: NaiveDateTime) -> Self {
        Self {
            truck: truck.clone(),
            moves: Vec::new(),
            rotated_at,
        }
    }

    /// 是否实际发生了移动
    pub fn applied(&self) -> bool {
        !self.moves.is_empty()
    }
}

// ==========================================
// RotationEngine - 轮换引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RotationEngine {
    locator: TireLocator,
}

impl RotationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // 手动换位
    // ==========================================

    /// 交换两个轮胎的位置
    ///
    /// 支持 轮位↔轮位 / 轮位↔备胎 / 备胎↔备胎
    /// 任一轮胎找不到或两者相同 → 空操作 (applied=false)
    pub fn swap(
        &self,
        truck: &Truck,
        tire_a: &str,
        tire_b: &str,
        now: NaiveDateTime,
    ) -> RotationOutcome {
        if tire_a == tire_b {
            tracing::debug!("换位跳过: 同一轮胎 tire_id={}", tire_a);
            return RotationOutcome::unchanged(truck, now);
        }

        let (Some(from_a), Some(from_b)) = (
            self.locator.locate(truck, tire_a),
            self.locator.locate(truck, tire_b),
        ) else {
            tracing::debug!("换位跳过: 轮胎未找到 a={}, b={}", tire_a, tire_b);
            return RotationOutcome::unchanged(truck, now);
        };
        let (Some(arc_a), Some(arc_b)) = (truck.tire_arc(&from_a), truck.tire_arc(&from_b)) else {
            return RotationOutcome::unchanged(truck, now);
        };

        let to_a = TireLocation {
            tire_id: from_a.tire_id.clone(),
            container: from_b.container.clone(),
            label: from_b.label.clone(),
        };
        let to_b = TireLocation {
            tire_id: from_b.tire_id.clone(),
            container: from_a.container.clone(),
            label: from_a.label.clone(),
        };

        let mut next = truck.clone();
        next.place_tire(&to_a, arc_a);
        next.place_tire(&to_b, arc_b);

        let moves = vec![
            Self::stamp_move(&mut next, from_a, to_a, now),
            Self::stamp_move(&mut next, from_b, to_b, now),
        ]
        .into_iter()
        .flatten()
        .collect();

        RotationOutcome {
            truck: next,
            moves,
            rotated_at: now,
        }
    }

    // ==========================================
    // X 型自动轮换
    // ==========================================

    /// 解析 X 轮换的目标轴序号
    pub fn resolve_axle(&self, truck: &Truck, selector: &AxleSelector) -> EngineResult<usize> {
        let index = match selector {
            AxleSelector::TractionOrFallback(fallback) => truck
                .axles
                .iter()
                .position(|a| a.axle_type == AxleType::Traction)
                .unwrap_or(*fallback),
            AxleSelector::Index(index) => *index,
            AxleSelector::Id(axle_id) => truck
                .axles
                .iter()
                .position(|a| &a.id == axle_id)
                .ok_or_else(|| EngineError::Validation(format!("车轴不存在: axle_id={}", axle_id)))?,
        };

        if index >= truck.axles.len() {
            return Err(EngineError::Validation(format!(
                "车轴不存在: axle_index={} (共 {} 根轴)",
                index,
                truck.axles.len()
            )));
        }
        Ok(index)
    }

    /// X 型轮换
    ///
    /// 只适用于 4 位轴: 0↔2, 1↔3
    /// 轴形态不符 → Validation 错误,不做任何修改
    /// 空轮位随交叉移动,但不产生记录
    #[instrument(skip(self, truck), fields(truck_id = %truck.id))]
    pub fn x_rotate(
        &self,
        truck: &Truck,
        selector: &AxleSelector,
        now: NaiveDateTime,
    ) -> EngineResult<RotationOutcome> {
        let axle_index = self.resolve_axle(truck, selector)?;
        let axle = &truck.axles[axle_index];
        if axle.slot_count() != 4 {
            return Err(EngineError::Validation(format!(
                "X 轮换需要 4 位轴: axle_id={}, slot_count={}",
                axle.id,
                axle.slot_count()
            )));
        }

        let mut next = truck.clone();
        {
            let target = Arc::make_mut(&mut next.axles[axle_index]);
            for (from, to) in X_PATTERN {
                target.slots[to] = axle.slots[from].clone();
            }
        }

        let mut moves = Vec::new();
        for (from, to) in X_PATTERN {
            let Some(tire) = axle.slots[from].as_ref() else {
                continue;
            };
            let from_loc = TireLocation::axle_slot(tire.id.clone(), axle_index, axle.id.clone(), from, 4);
            let to_loc = TireLocation::axle_slot(tire.id.clone(), axle_index, axle.id.clone(), to, 4);
            moves.extend(Self::stamp_move(&mut next, from_loc, to_loc, now));
        }

        tracing::info!(
            "X 轮换完成: axle_id={}, moved={}",
            axle.id,
            moves.len()
        );

        Ok(RotationOutcome {
            truck: next,
            moves,
            rotated_at: now,
        })
    }

    /// 更新新位置上轮胎的 position 并追加 ROTATION 记录
    fn stamp_move(
        truck: &mut Truck,
        from: TireLocation,
        to: TireLocation,
        now: NaiveDateTime,
    ) -> Option<TireMove> {
        let tire = truck.tire_mut(&to)?;
        let record = MaintenanceRecord::new(
            MaintenanceKind::Rotation,
            format!("{} → {}", from.qualified_label(), to.qualified_label()),
            0.0,
            now,
        );
        let record_id = record.id.clone();
        tire.position = to.label.clone();
        tire.push_record(record);

        Some(TireMove {
            tire_id: to.tire_id.clone(),
            from,
            to,
            record_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tire::Tire;
    use crate::domain::truck::Axle;
    use crate::domain::types::TireStatus;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn tire(id: &str) -> Tire {
        Tire::new(id, "Bridgestone")
    }

    fn truck() -> Truck {
        Truck::new("truck-01", "HUE-2024", "Volvo FH 540")
            .with_axle(Axle::with_tires("axle-1", AxleType::Front, vec![tire("F0"), tire("F1")]))
            .with_axle(Axle::with_tires(
                "axle-2",
                AxleType::Traction,
                vec![tire("T0"), tire("T1"), tire("T2"), tire("T3")],
            ))
            .with_spare(tire("S0"))
    }

    fn slot_ids(truck: &Truck, axle_index: usize) -> Vec<Option<String>> {
        truck.axles[axle_index]
            .slots
            .iter()
            .map(|s| s.as_ref().map(|t| t.id.clone()))
            .collect()
    }

    fn rotations(truck: &Truck, tire_id: &str) -> usize {
        TireLocator::new()
            .find_tire(truck, tire_id)
            .map(|t| t.history().iter().filter(|r| r.kind == MaintenanceKind::Rotation).count())
            .unwrap_or(0)
    }

    // ==========================================
    // 手动换位
    // ==========================================

    #[test]
    fn test_scenario_1_swap_slot_with_slot() {
        let engine = RotationEngine::new();
        let before = truck();
        let outcome = engine.swap(&before, "F0", "T2", now());
        assert!(outcome.applied());

        let after = &outcome.truck;
        assert_eq!(after.axles[0].tire_at(0).unwrap().id, "T2");
        assert_eq!(after.axles[1].tire_at(2).unwrap().id, "F0");

        let f0 = after.axles[1].tire_at(2).unwrap();
        assert_eq!(f0.position, "Inner Right");
        assert_eq!(f0.last_record().unwrap().description, "Axle 1 - Left → Axle 2 - Inner Right");

        let t2 = after.axles[0].tire_at(0).unwrap();
        assert_eq!(t2.position, "Left");
        assert_eq!(t2.last_record().unwrap().description, "Axle 2 - Inner Right → Axle 1 - Left");
        assert_eq!(f0.last_record().unwrap().recorded_at, t2.last_record().unwrap().recorded_at);

        // 旧快照不变
        assert_eq!(before.axles[0].tire_at(0).unwrap().id, "F0");
        assert!(before.axles[0].tire_at(0).unwrap().history().is_empty());
    }

    #[test]
    fn test_scenario_2_swap_slot_with_spare() {
        let engine = RotationEngine::new();
        let outcome = engine.swap(&truck(), "S0", "F1", now());
        let after = &outcome.truck;

        assert_eq!(after.axles[0].tire_at(1).unwrap().id, "S0");
        assert_eq!(after.spares[0].id, "F1");
        assert_eq!(after.spares[0].position, "Spare #1");
        assert_eq!(after.axles[0].tire_at(1).unwrap().position, "Right");
        assert_eq!(outcome.moves.len(), 2);
    }

    #[test]
    fn test_scenario_3_swap_missing_tire_is_noop() {
        let engine = RotationEngine::new();
        let before = truck();
        let outcome = engine.swap(&before, "F0", "NOPE", now());
        assert!(!outcome.applied());
        assert_eq!(outcome.truck, before);
    }

    #[test]
    fn test_scenario_4_swap_same_tire_is_noop() {
        let engine = RotationEngine::new();
        let outcome = engine.swap(&truck(), "T1", "T1", now());
        assert!(!outcome.applied());
        assert_eq!(rotations(&outcome.truck, "T1"), 0);
    }

    #[test]
    fn test_scenario_5_swap_is_involution_on_placement() {
        let engine = RotationEngine::new();
        let original = truck();
        let once = engine.swap(&original, "F1", "T3", now()).truck;
        let twice = engine.swap(&once, "F1", "T3", now()).truck;

        assert_eq!(slot_ids(&twice, 0), slot_ids(&original, 0));
        assert_eq!(slot_ids(&twice, 1), slot_ids(&original, 1));
        assert_eq!(rotations(&twice, "F1"), 2);
        assert_eq!(rotations(&twice, "T3"), 2);
    }

    #[test]
    fn test_scenario_6_swap_is_symmetric() {
        let engine = RotationEngine::new();
        let ab = engine.swap(&truck(), "F0", "S0", now()).truck;
        let ba = engine.swap(&truck(), "S0", "F0", now()).truck;
        assert_eq!(slot_ids(&ab, 0), slot_ids(&ba, 0));
        assert_eq!(ab.spares[0].id, ba.spares[0].id);
    }

    #[test]
    fn test_scenario_7_swap_shares_untouched_axles() {
        let engine = RotationEngine::new();
        let before = truck();
        let after = engine.swap(&before, "F0", "F1", now()).truck;
        assert!(Arc::ptr_eq(&before.axles[1], &after.axles[1]));
        assert!(Arc::ptr_eq(&before.spares[0], &after.spares[0]));
    }

    // ==========================================
    // X 型轮换
    // ==========================================

    #[test]
    fn test_scenario_8_x_rotation_pattern() {
        let engine = RotationEngine::new();
        let outcome = engine
            .x_rotate(&truck(), &AxleSelector::TractionOrFallback(1), now())
            .unwrap();

        assert_eq!(
            slot_ids(&outcome.truck, 1),
            vec![Some("T2".into()), Some("T3".into()), Some("T0".into()), Some("T1".into())]
        );
        for id in ["T0", "T1", "T2", "T3"] {
            assert_eq!(rotations(&outcome.truck, id), 1, "{} 应有一条轮换记录", id);
        }
        assert_eq!(outcome.moves.len(), 4);
        assert!(outcome.moves.iter().all(|m| m.from.axle_id() == Some("axle-2")));

        let t0 = outcome.truck.axles[1].tire_at(2).unwrap();
        assert_eq!(t0.position, "Inner Right");
        assert_eq!(t0.last_record().unwrap().description, "Axle 2 - Outer Left → Axle 2 - Inner Right");
        assert_eq!(t0.last_record().unwrap().recorded_at, now());
    }

    #[test]
    fn test_scenario_9_x_rotation_involution() {
        let engine = RotationEngine::new();
        let original = truck();
        let selector = AxleSelector::Id("axle-2".into());
        let once = engine.x_rotate(&original, &selector, now()).unwrap().truck;
        let twice = engine.x_rotate(&once, &selector, now()).unwrap().truck;
        assert_eq!(slot_ids(&twice, 1), slot_ids(&original, 1));
        assert_eq!(rotations(&twice, "T0"), 2);
    }

    #[test]
    fn test_scenario_10_x_rotation_rejects_single_axle() {
        let engine = RotationEngine::new();
        let err = engine
            .x_rotate(&truck(), &AxleSelector::Index(0), now())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_scenario_11_fallback_axle_when_no_traction() {
        let engine = RotationEngine::new();
        let t = Truck::new("truck-02", "ABC-1234", "Scania")
            .with_axle(Axle::with_tires("axle-1", AxleType::Front, vec![tire("A"), tire("B")]))
            .with_axle(Axle::with_tires(
                "axle-2",
                AxleType::Trailer,
                vec![tire("C"), tire("D"), tire("E"), tire("F")],
            ));
        assert_eq!(engine.resolve_axle(&t, &AxleSelector::TractionOrFallback(1)).unwrap(), 1);
        assert!(engine.resolve_axle(&t, &AxleSelector::TractionOrFallback(5)).is_err());
        assert!(engine.resolve_axle(&t, &AxleSelector::Id("axle-9".into())).is_err());
    }

    #[test]
    fn test_scenario_12_x_rotation_with_empty_slot() {
        let engine = RotationEngine::new();
        let mut axle = Axle::empty("axle-1", AxleType::Traction, 4);
        axle.slots[0] = Some(Arc::new(tire("T0")));
        axle.slots[3] = Some(Arc::new(tire("T3")));
        let t = Truck::new("truck-03", "XYZ-0001", "MB").with_axle(axle);

        let outcome = engine.x_rotate(&t, &AxleSelector::Index(0), now()).unwrap();
        assert_eq!(
            slot_ids(&outcome.truck, 0),
            vec![None, Some("T3".into()), Some("T0".into()), None]
        );
        assert_eq!(outcome.moves.len(), 2);
    }

    #[test]
    fn test_scenario_13_rotation_does_not_reclassify() {
        let engine = RotationEngine::new();
        let mut t = truck();
        // 人为放入一个与规则不一致的状态,轮换后保持原样
        let loc = TireLocator::new().locate(&t, "T0").unwrap();
        t.tire_mut(&loc).unwrap().tread_depth_mm = 1.0;

        let outcome = engine.x_rotate(&t, &AxleSelector::Index(1), now()).unwrap();
        assert_eq!(outcome.truck.axles[1].tire_at(2).unwrap().status, TireStatus::New);
    }
}
