// ==========================================
// RODDAR 轮胎管理系统 - 轮胎定位引擎
// ==========================================
// 职责: 按轮胎ID在车辆中定位 (先车轴轮位,后备胎)
// 红线: 找不到返回 None,调用方按空操作处理,不报错
// ==========================================

use crate::domain::position::{slot_label, spare_label, TireLocation};
use crate::domain::tire::Tire;
use crate::domain::truck::Truck;
use crate::domain::types::TireStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// SlotOption - 可选换位目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotOption {
    pub label: String,                    // "Axle 2 - Outer Left" / "Spare #1"
    pub axle_id: Option<String>,          // 备胎为 None
    pub slot_index: Option<usize>,        // 备胎为 None
    pub spare_index: Option<usize>,       // 轮位为 None
    pub tire_id: Option<String>,          // 空轮位为 None
    pub tire_brand: Option<String>,
    pub tire_status: Option<TireStatus>,
}

impl SlotOption {
    fn occupied_by(mut self, tire: Option<&Tire>) -> Self {
        if let Some(tire) = tire {
            self.tire_id = Some(tire.id.clone());
            self.tire_brand = Some(tire.brand.clone());
            self.tire_status = Some(tire.status);
        }
        self
    }
}

// ==========================================
// TireLocator - 轮胎定位器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TireLocator;

impl TireLocator {
    pub fn new() -> Self {
        Self
    }

    /// 定位轮胎
    ///
    /// 搜索顺序: 各车轴轮位 (按轴序、位序) → 备胎列表
    pub fn locate(&self, truck: &Truck, tire_id: &str) -> Option<TireLocation> {
        if tire_id.is_empty() {
            return None;
        }

        for (axle_index, axle) in truck.axles.iter().enumerate() {
            let hit = axle
                .slots
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|t| t.id == tire_id));
            if let Some(slot_index) = hit {
                return Some(TireLocation::axle_slot(
                    tire_id,
                    axle_index,
                    axle.id.clone(),
                    slot_index,
                    axle.slot_count(),
                ));
            }
        }

        truck
            .spares
            .iter()
            .position(|t| t.id == tire_id)
            .map(|spare_index| TireLocation::spare(tire_id, spare_index))
    }

    /// 查找轮胎 (只读)
    pub fn find_tire<'a>(&self, truck: &'a Truck, tire_id: &str) -> Option<&'a Tire> {
        let location = self.locate(truck, tire_id)?;
        truck.tire_at(&location)
    }

    /// 全车轮胎定位 (轴位在前,备胎在后)
    pub fn locate_all(&self, truck: &Truck) -> Vec<TireLocation> {
        let mut locations = Vec::new();
        for (axle_index, axle) in truck.axles.iter().enumerate() {
            for (slot_index, slot) in axle.slots.iter().enumerate() {
                if let Some(tire) = slot {
                    locations.push(TireLocation::axle_slot(
                        tire.id.clone(),
                        axle_index,
                        axle.id.clone(),
                        slot_index,
                        axle.slot_count(),
                    ));
                }
            }
        }
        for (spare_index, tire) in truck.spares.iter().enumerate() {
            locations.push(TireLocation::spare(tire.id.clone(), spare_index));
        }
        locations
    }

    /// 换位候选列表
    ///
    /// 列出除 exclude_tire_id 所在位置外的全部轮位与备胎位,包括空轮位
    pub fn rotation_options(&self, truck: &Truck, exclude_tire_id: &str) -> Vec<SlotOption> {
        let mut options = Vec::new();

        for (axle_index, axle) in truck.axles.iter().enumerate() {
            for (slot_index, slot) in axle.slots.iter().enumerate() {
                let tire = slot.as_deref();
                if tire.is_some_and(|t| t.id == exclude_tire_id) {
                    continue;
                }
                let option = SlotOption {
                    label: format!(
                        "Axle {} - {}",
                        axle_index + 1,
                        slot_label(slot_index, axle.slot_count())
                    ),
                    axle_id: Some(axle.id.clone()),
                    slot_index: Some(slot_index),
                    spare_index: None,
                    tire_id: None,
                    tire_brand: None,
                    tire_status: None,
                };
                options.push(option.occupied_by(tire));
            }
        }

        for (spare_index, tire) in truck.spares.iter().enumerate() {
            if tire.id == exclude_tire_id {
                continue;
            }
            let option = SlotOption {
                label: spare_label(spare_index),
                axle_id: None,
                slot_index: None,
                spare_index: Some(spare_index),
                tire_id: None,
                tire_brand: None,
                tire_status: None,
            };
            options.push(option.occupied_by(Some(tire)));
        }

        options
    }
}
