// ==========================================
// 轮换引擎集成测试
// ==========================================
// 测试范围: TireLocator → RotationEngine (换位 / X 轮换)
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::test_data_builder::*;
use roddar::domain::types::{AxleType, MaintenanceKind};
use roddar::engine::{AxleSelector, EngineError, RotationEngine, TireLocator};

// ==========================================
// 场景1: 驱动轴 X 轮换
// ==========================================

#[test]
fn test_scenario_1_x_rotation_on_traction_axle() {
    let truck = standard_truck("truck-01");
    let now = ts(2024, 5, 10, 9);

    let outcome = RotationEngine::new()
        .x_rotate(&truck, &AxleSelector::TractionOrFallback(1), now)
        .unwrap();
    let next = &outcome.truck;
    let axle = next.axle(1).unwrap();

    // 外左 ↔ 内右, 内左 ↔ 外右
    let ids: Vec<&str> = (0..4).map(|i| axle.tire_at(i).unwrap().id.as_str()).collect();
    assert_eq!(ids, vec!["FIRE-005", "FIRE-006", "FIRE-003", "FIRE-004"]);
    assert_eq!(outcome.moves.len(), 4);

    let moved = axle.tire_at(2).unwrap();
    assert_eq!(moved.id, "FIRE-003");
    assert_eq!(moved.position, "Inner Right");
    let record = moved.last_record().unwrap();
    assert_eq!(record.kind, MaintenanceKind::Rotation);
    assert_eq!(record.recorded_at, now);
    assert_eq!(record.description, "Axle 2 - Outer Left → Axle 2 - Inner Right");

    // 原快照不变,前轴仍共享
    assert_eq!(truck.axle(1).unwrap().tire_at(0).unwrap().id, "FIRE-003");
    assert!(Arc::ptr_eq(&truck.axles[0], &next.axles[0]));
}

// ==========================================
// 场景2: 两次 X 轮换回到原位
// ==========================================

#[test]
fn test_scenario_2_double_rotation_restores_layout() {
    let engine = RotationEngine::new();
    let truck = standard_truck("truck-01");
    let once = engine
        .x_rotate(&truck, &AxleSelector::Index(1), ts(2024, 5, 10, 9))
        .unwrap();
    let twice = engine
        .x_rotate(&once.truck, &AxleSelector::Index(1), ts(2024, 5, 11, 9))
        .unwrap();

    for i in 0..4 {
        let before = truck.axle(1).unwrap().tire_at(i).unwrap();
        let after = twice.truck.axle(1).unwrap().tire_at(i).unwrap();
        assert_eq!(before.id, after.id);
        assert_eq!(after.history().len(), before.history().len() + 2);
    }
}

// ==========================================
// 场景3: 无驱动轴时使用备用轴; 2 位轴拒绝
// ==========================================

#[test]
fn test_scenario_3_fallback_axle_and_shape_validation() {
    let truck = TruckBuilder::new("truck-02")
        .axle(
            AxleType::Front,
            vec![TireBuilder::new("F-1").build(), TireBuilder::new("F-2").build()],
        )
        .axle(
            AxleType::Trailer,
            (1..=4).map(|n| TireBuilder::new(&format!("T-{}", n)).build()).collect(),
        )
        .build();
    let engine = RotationEngine::new();

    let outcome = engine
        .x_rotate(&truck, &AxleSelector::TractionOrFallback(1), ts(2024, 6, 1, 8))
        .unwrap();
    assert_eq!(outcome.truck.axle(1).unwrap().tire_at(0).unwrap().id, "T-3");

    let err = engine
        .x_rotate(&truck, &AxleSelector::TractionOrFallback(0), ts(2024, 6, 1, 8))
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .x_rotate(&truck, &AxleSelector::Id("axle-9".to_string()), ts(2024, 6, 1, 8))
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

// ==========================================
// 场景4: 轮位 ↔ 备胎 换位
// ==========================================

#[test]
fn test_scenario_4_swap_with_spare() {
    let truck = standard_truck("truck-01");
    let now = ts(2024, 7, 2, 14);
    let outcome = RotationEngine::new().swap(&truck, "FIRE-001", "STP-001", now);
    assert!(outcome.applied());

    let locator = TireLocator::new();
    let spare_loc = locator.locate(&outcome.truck, "FIRE-001").unwrap();
    assert!(spare_loc.is_spare());
    assert_eq!(spare_loc.label, "Spare #1");

    let front = locator.locate(&outcome.truck, "STP-001").unwrap();
    assert_eq!(front.axle_id(), Some("axle-1"));
    assert_eq!(front.label, "Left");

    let spare = locator.find_tire(&outcome.truck, "STP-001").unwrap();
    assert_eq!(spare.position, "Left");
    assert_eq!(spare.last_record().unwrap().description, "Spare #1 → Axle 1 - Left");
}

// ==========================================
// 场景5: 换位空操作
// ==========================================

#[test]
fn test_scenario_5_swap_noop_cases() {
    let truck = standard_truck("truck-01");
    let engine = RotationEngine::new();
    let now = ts(2024, 7, 2, 14);

    let same = engine.swap(&truck, "FIRE-001", "FIRE-001", now);
    assert!(!same.applied());
    assert_eq!(same.truck, truck);

    let missing = engine.swap(&truck, "FIRE-001", "FIRE-999", now);
    assert!(!missing.applied());
    assert_eq!(missing.truck, truck);
}

// ==========================================
// 场景6: 空轮位随 X 交叉移动
// ==========================================

#[test]
fn test_scenario_6_empty_slots_move_without_records() {
    let mut truck = TruckBuilder::new("truck-03")
        .axle(
            AxleType::Traction,
            (1..=4).map(|n| TireBuilder::new(&format!("D-{}", n)).build()).collect(),
        )
        .build();
    // 移除内左 (slot 1)
    std::sync::Arc::make_mut(&mut truck.axles[0]).slots[1] = None;

    let outcome = RotationEngine::new()
        .x_rotate(&truck, &AxleSelector::Index(0), ts(2024, 8, 1, 8))
        .unwrap();
    let axle = outcome.truck.axle(0).unwrap();
    assert!(axle.tire_at(3).is_none());
    assert_eq!(axle.tire_at(1).unwrap().id, "D-4");
    assert_eq!(outcome.moves.len(), 3);
}
