// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use roddar::domain::position::{slot_label, spare_label};
use roddar::domain::tire::{MaintenanceRecord, Tire};
use roddar::domain::truck::{Axle, Truck};
use roddar::domain::types::{AxleType, MaintenanceKind};
use chrono::{NaiveDate, NaiveDateTime};

pub fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

// ==========================================
// Tire 构建器
// ==========================================

pub struct TireBuilder {
    id: String,
    brand: String,
    initial_km: f64,
    current_km: f64,
    tread_depth_mm: f64,
    purchase_price: f64,
    events: Vec<MaintenanceKind>,
}

impl TireBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            brand: "Michelin".to_string(),
            initial_km: 0.0,
            current_km: 0.0,
            tread_depth_mm: 18.0,
            purchase_price: 2500.0,
            events: Vec::new(),
        }
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }

    pub fn km(mut self, initial_km: f64, current_km: f64) -> Self {
        self.initial_km = initial_km;
        self.current_km = current_km;
        self
    }

    pub fn tread(mut self, mm: f64) -> Self {
        self.tread_depth_mm = mm;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.purchase_price = price;
        self
    }

    pub fn event(mut self, kind: MaintenanceKind) -> Self {
        self.events.push(kind);
        self
    }

    pub fn build(self) -> Tire {
        let mut tire = Tire::new(self.id, self.brand)
            .with_km(self.initial_km, self.current_km)
            .with_tread_depth(self.tread_depth_mm)
            .with_price(self.purchase_price);
        for kind in self.events {
            tire = tire.with_record(MaintenanceRecord::new(kind, kind.as_str(), 0.0, ts(2024, 1, 1, 8)));
        }
        tire
    }
}

// ==========================================
// Truck 构建器
// ==========================================

pub struct TruckBuilder {
    id: String,
    plate: String,
    total_km: f64,
    axles: Vec<Axle>,
    spares: Vec<Tire>,
}

impl TruckBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            plate: "HUE-2024".to_string(),
            total_km: 100_000.0,
            axles: Vec::new(),
            spares: Vec::new(),
        }
    }

    pub fn total_km(mut self, km: f64) -> Self {
        self.total_km = km;
        self
    }

    pub fn axle(mut self, axle_type: AxleType, mut tires: Vec<Tire>) -> Self {
        let count = tires.len();
        for (i, tire) in tires.iter_mut().enumerate() {
            tire.position = slot_label(i, count);
        }
        let id = format!("axle-{}", self.axles.len() + 1);
        self.axles.push(Axle::with_tires(id, axle_type, tires));
        self
    }

    pub fn empty_axle(mut self, axle_type: AxleType, slot_count: usize) -> Self {
        let id = format!("axle-{}", self.axles.len() + 1);
        self.axles.push(Axle::empty(id, axle_type, slot_count));
        self
    }

    pub fn spare(mut self, mut tire: Tire) -> Self {
        tire.position = spare_label(self.spares.len());
        self.spares.push(tire);
        self
    }

    pub fn build(self) -> Truck {
        let mut truck = Truck::new(self.id, self.plate, "Volvo FH 540").with_total_km(self.total_km);
        for axle in self.axles {
            truck = truck.with_axle(axle);
        }
        for spare in self.spares {
            truck = truck.with_spare(spare);
        }
        truck
    }
}

/// 标准测试车: 前轴 2 位 (FIRE-001/002) + 驱动轴 4 位 (FIRE-003..006) + 备胎 STP-001
pub fn standard_truck(id: &str) -> Truck {
    TruckBuilder::new(id)
        .total_km(124_500.0)
        .axle(
            AxleType::Front,
            vec![
                TireBuilder::new("FIRE-001").km(0.0, 45_000.0).tread(10.0).price(2800.0).build(),
                TireBuilder::new("FIRE-002").km(0.0, 45_000.0).tread(10.0).price(2800.0).build(),
            ],
        )
        .axle(
            AxleType::Traction,
            (3..=6)
                .map(|n| {
                    TireBuilder::new(&format!("FIRE-00{}", n))
                        .brand("Bridgestone")
                        .km(0.0, 5000.0)
                        .price(2400.0)
                        .build()
                })
                .collect(),
        )
        .spare(TireBuilder::new("STP-001").brand("Goodyear").km(0.0, 1000.0).tread(10.0).build())
        .build()
}
