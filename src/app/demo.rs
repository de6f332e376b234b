// ==========================================
// RODDAR 轮胎管理系统 - 演示数据
// ==========================================
// 职责: 无输入文件时提供一辆完整的演示车辆
// ==========================================

use chrono::NaiveDate;

use crate::domain::position::{slot_label, spare_label};
use crate::domain::tire::Tire;
use crate::domain::truck::{Axle, Owner, Truck};
use crate::domain::types::AxleType;

fn demo_tire(id: &str, brand: &str, price: f64, km: f64, tread_depth_mm: f64) -> Tire {
    let mut tire = Tire::new(id, brand)
        .with_km(0.0, km)
        .with_tread_depth(tread_depth_mm)
        .with_price(price);
    tire.model = "X Multi Z".to_string();
    tire.dot = "2323".to_string();
    tire.size = "295/80R22.5".to_string();
    tire.purchase_date = NaiveDate::from_ymd_opt(2023, 1, 15);
    tire
}

fn placed(mut tires: Vec<Tire>) -> Vec<Tire> {
    let count = tires.len();
    for (i, tire) in tires.iter_mut().enumerate() {
        tire.position = slot_label(i, count);
    }
    tires
}

/// 演示车辆: 前轴 2 位 + 驱动轴 4 位 + 1 条备胎
///
/// 状态字段不在此设置,导入时由规则统一派生
pub fn demo_truck() -> Truck {
    let mut spare = demo_tire("STP-001", "Goodyear", 2200.0, 1000.0, 10.0);
    spare.position = spare_label(0);

    let mut truck = Truck::new("truck-01", "HUE-2024", "Volvo FH 540")
        .with_total_km(124_500.0)
        .with_axle(Axle::with_tires(
            "axle-1",
            AxleType::Front,
            placed(vec![
                demo_tire("FIRE-001", "Michelin", 2800.0, 45_000.0, 10.0),
                demo_tire("FIRE-002", "Michelin", 2800.0, 45_000.0, 10.0),
            ]),
        ))
        .with_axle(Axle::with_tires(
            "axle-2",
            AxleType::Traction,
            placed(
                (3..=6)
                    .map(|n| demo_tire(&format!("FIRE-00{}", n), "Bridgestone", 2400.0, 5000.0, 18.0))
                    .collect(),
            ),
        ))
        .with_spare(spare);

    truck.owner = Some(Owner {
        name: "Transportadora Modelo".to_string(),
        driver_name: "João da Silva".to_string(),
        city: "Tabuleiro do Norte - CE".to_string(),
        street: "Rodovia BR-116".to_string(),
        number: "KM 200".to_string(),
        phone: "(88) 99999-0000".to_string(),
        email: Some("contato@modelo.com".to_string()),
    });
    truck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TireStatus;
    use crate::engine::TireStatusEngine;

    #[test]
    fn test_demo_truck_layout() {
        let truck = demo_truck();
        assert_eq!(truck.axles.len(), 2);
        assert_eq!(truck.axles[1].axle_type, AxleType::Traction);
        assert_eq!(truck.installed_tires().count(), 6);
        assert_eq!(truck.axles[1].tire_at(2).unwrap().position, "Inner Right");
        assert_eq!(truck.spares[0].position, "Spare #1");
    }

    #[test]
    fn test_demo_truck_statuses() {
        let (truck, _) = TireStatusEngine::new().reclassify_truck(&demo_truck());
        // 前轴已过半寿命里程
        assert_eq!(truck.axles[0].tire_at(0).unwrap().status, TireStatus::Good);
        assert_eq!(truck.axles[1].tire_at(0).unwrap().status, TireStatus::New);
    }
}
