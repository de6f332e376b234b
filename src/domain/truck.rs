// ==========================================
// RODDAR 轮胎管理系统 - 车辆领域模型
// ==========================================
// 职责: 车辆 / 车轴 / 车主
// 所有权: Truck 独占 Axle、备胎与行程历史; Axle 独占其轮位上的轮胎
// 快照: 子结构用 Arc 共享,变更时只复制被修改的路径 (Arc::make_mut)
// ==========================================

use crate::domain::position::{TireContainer, TireLocation};
use crate::domain::tire::Tire;
use crate::domain::trip::Trip;
use crate::domain::types::AxleType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// Axle - 车轴
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axle {
    pub id: String,
    pub axle_type: AxleType,
    pub slots: Vec<Option<Arc<Tire>>>, // None 表示空轮位
}

impl Axle {
    /// 创建空轴 (slot_count 个空轮位)
    pub fn empty(id: impl Into<String>, axle_type: AxleType, slot_count: usize) -> Self {
        Self {
            id: id.into(),
            axle_type,
            slots: vec![None; slot_count],
        }
    }

    pub fn with_tires(id: impl Into<String>, axle_type: AxleType, tires: Vec<Tire>) -> Self {
        Self {
            id: id.into(),
            axle_type,
            slots: tires.into_iter().map(|t| Some(Arc::new(t))).collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// 双胎轴 (4 位)
    pub fn is_dual(&self) -> bool {
        self.slots.len() == 4
    }

    pub fn tire_at(&self, slot_index: usize) -> Option<&Tire> {
        self.slots.get(slot_index).and_then(|s| s.as_deref())
    }

    /// 已安装的轮胎 (跳过空轮位)
    pub fn tires(&self) -> impl Iterator<Item = &Tire> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }
}

// ==========================================
// Owner - 车主/司机
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,        // 公司/车主
    pub driver_name: String, // 司机
    pub city: String,
    pub street: String,
    pub number: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ==========================================
// Truck - 车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: String,
    pub plate: String,
    pub model: String,
    pub axles: Vec<Arc<Axle>>,
    #[serde(default)]
    pub spares: Vec<Arc<Tire>>,
    pub total_km: f64, // 累计里程
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub active_trip: Option<Trip>,
    #[serde(default)]
    pub trip_history: Arc<Vec<Trip>>, // 新的在前
}

impl Truck {
    pub fn new(id: impl Into<String>, plate: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plate: plate.into(),
            model: model.into(),
            axles: Vec::new(),
            spares: Vec::new(),
            total_km: 0.0,
            owner: None,
            active_trip: None,
            trip_history: Arc::new(Vec::new()),
        }
    }

    pub fn with_axle(mut self, axle: Axle) -> Self {
        self.axles.push(Arc::new(axle));
        self
    }

    pub fn with_spare(mut self, tire: Tire) -> Self {
        self.spares.push(Arc::new(tire));
        self
    }

    pub fn with_total_km(mut self, total_km: f64) -> Self {
        self.total_km = total_km;
        self
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn has_active_trip(&self) -> bool {
        self.active_trip.is_some()
    }

    pub fn axle(&self, axle_index: usize) -> Option<&Axle> {
        self.axles.get(axle_index).map(|a| a.as_ref())
    }

    /// 已安装轮胎 (非备胎、非空位)
    pub fn installed_tires(&self) -> impl Iterator<Item = &Tire> {
        self.axles.iter().flat_map(|a| a.tires())
    }

    pub fn spare_tires(&self) -> impl Iterator<Item = &Tire> {
        self.spares.iter().map(|t| t.as_ref())
    }

    /// 全部轮胎: 先轴位,后备胎
    pub fn all_tires(&self) -> impl Iterator<Item = &Tire> {
        self.installed_tires().chain(self.spare_tires())
    }

    /// 按定位结果取轮胎 (位置上的轮胎ID必须与定位一致)
    pub fn tire_at(&self, location: &TireLocation) -> Option<&Tire> {
        let tire = match &location.container {
            TireContainer::AxleSlot {
                axle_index,
                slot_index,
                ..
            } => self.axles.get(*axle_index)?.tire_at(*slot_index),
            TireContainer::Spare { spare_index } => self.spares.get(*spare_index).map(|t| t.as_ref()),
        }?;
        (tire.id == location.tire_id).then_some(tire)
    }

    // ==========================================
    // 写时复制辅助 (仅限引擎层)
    // ==========================================

    /// 取出定位处轮胎的共享指针
    pub(crate) fn tire_arc(&self, location: &TireLocation) -> Option<Arc<Tire>> {
        match &location.container {
            TireContainer::AxleSlot {
                axle_index,
                slot_index,
                ..
            } => self.axles.get(*axle_index)?.slots.get(*slot_index)?.clone(),
            TireContainer::Spare { spare_index } => self.spares.get(*spare_index).cloned(),
        }
    }

    /// 把轮胎放入定位处 (只复制该轴或备胎列表)
    pub(crate) fn place_tire(&mut self, location: &TireLocation, tire: Arc<Tire>) {
        match &location.container {
            TireContainer::AxleSlot {
                axle_index,
                slot_index,
                ..
            } => {
                if let Some(axle) = self.axles.get_mut(*axle_index) {
                    let axle = Arc::make_mut(axle);
                    if let Some(slot) = axle.slots.get_mut(*slot_index) {
                        *slot = Some(tire);
                    }
                }
            }
            TireContainer::Spare { spare_index } => {
                if let Some(slot) = self.spares.get_mut(*spare_index) {
                    *slot = tire;
                }
            }
        }
    }

    /// 定位处轮胎的可变引用 (按需复制该轴与该轮胎)
    pub(crate) fn tire_mut(&mut self, location: &TireLocation) -> Option<&mut Tire> {
        let arc = match &location.container {
            TireContainer::AxleSlot {
                axle_index,
                slot_index,
                ..
            } => {
                let axle = Arc::make_mut(self.axles.get_mut(*axle_index)?);
                axle.slots.get_mut(*slot_index)?.as_mut()?
            }
            TireContainer::Spare { spare_index } => self.spares.get_mut(*spare_index)?,
        };
        let tire = Arc::make_mut(arc);
        (tire.id == location.tire_id).then_some(tire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck() -> Truck {
        Truck::new("truck-01", "HUE-2024", "Volvo FH 540")
            .with_axle(Axle::with_tires(
                "axle-1",
                AxleType::Front,
                vec![Tire::new("FIRE-001", "Michelin"), Tire::new("FIRE-002", "Michelin")],
            ))
            .with_axle(Axle::empty("axle-2", AxleType::Traction, 4))
            .with_spare(Tire::new("STP-001", "Goodyear"))
    }

    #[test]
    fn test_installed_skips_empty_slots() {
        let t = truck();
        assert_eq!(t.installed_tires().count(), 2);
        assert_eq!(t.spare_tires().count(), 1);
        assert_eq!(t.all_tires().count(), 3);
    }

    #[test]
    fn test_tire_mut_copies_only_touched_path() {
        let before = truck();
        let mut after = before.clone();

        let loc = TireLocation::axle_slot("FIRE-001", 0, "axle-1", 0, 2);
        after.tire_mut(&loc).unwrap().current_km = 500.0;

        // 旧快照不受影响
        assert_eq!(before.axle(0).unwrap().tire_at(0).unwrap().current_km, 0.0);
        assert_eq!(after.axle(0).unwrap().tire_at(0).unwrap().current_km, 500.0);
        // 未触碰的轴与备胎仍然共享
        assert!(Arc::ptr_eq(&before.axles[1], &after.axles[1]));
        assert!(Arc::ptr_eq(&before.spares[0], &after.spares[0]));
        assert!(!Arc::ptr_eq(&before.axles[0], &after.axles[0]));
    }

    #[test]
    fn test_tire_at_rejects_stale_location() {
        let t = truck();
        let stale = TireLocation::axle_slot("FIRE-999", 0, "axle-1", 0, 2);
        assert!(t.tire_at(&stale).is_none());
    }

    #[test]
    fn test_serde_roundtrip_keeps_empty_slots() {
        let t = truck();
        let json = serde_json::to_string(&t).unwrap();
        let back: Truck = serde_json::from_str(&json).unwrap();
        assert_eq!(back.axle(1).unwrap().slot_count(), 4);
        assert_eq!(back.axle(1).unwrap().tires().count(), 0);
        assert_eq!(back, t);
    }
}
