// ==========================================
// RODDAR 轮胎管理系统 - 轮位寻址
// ==========================================
// 职责: 轮位容器类型 + 轮位标签规则
// 红线: 标签只是展示字符串,定位一律按轮胎ID搜索
// ==========================================

use serde::{Deserialize, Serialize};

const DUAL_SLOT_LABELS: [&str; 4] = ["Outer Left", "Inner Left", "Inner Right", "Outer Right"];

/// 车轴轮位标签
///
/// - 2 位轴: 0=Left, 1=Right
/// - 4 位轴: 0=Outer Left, 1=Inner Left, 2=Inner Right, 3=Outer Right
/// - 其他位数: "Slot {n}" (1 起)
pub fn slot_label(slot_index: usize, slot_count: usize) -> String {
    match (slot_count, slot_index) {
        (2, 0) => "Left".to_string(),
        (2, 1) => "Right".to_string(),
        (4, i) if i < 4 => DUAL_SLOT_LABELS[i].to_string(),
        (_, i) => format!("Slot {}", i + 1),
    }
}

/// 备胎标签: "Spare #{n}" (1 起)
pub fn spare_label(spare_index: usize) -> String {
    format!("Spare #{}", spare_index + 1)
}

// ==========================================
// TireContainer - 轮胎所在容器
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TireContainer {
    AxleSlot {
        axle_index: usize,
        axle_id: String,
        slot_index: usize,
        slot_count: usize,
    },
    Spare {
        spare_index: usize,
    },
}

// ==========================================
// TireLocation - 定位结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireLocation {
    pub tire_id: String,
    pub container: TireContainer,
    pub label: String,
}

impl TireLocation {
    pub fn axle_slot(
        tire_id: impl Into<String>,
        axle_index: usize,
        axle_id: impl Into<String>,
        slot_index: usize,
        slot_count: usize,
    ) -> Self {
        Self {
            tire_id: tire_id.into(),
            container: TireContainer::AxleSlot {
                axle_index,
                axle_id: axle_id.into(),
                slot_index,
                slot_count,
            },
            label: slot_label(slot_index, slot_count),
        }
    }

    pub fn spare(tire_id: impl Into<String>, spare_index: usize) -> Self {
        Self {
            tire_id: tire_id.into(),
            container: TireContainer::Spare { spare_index },
            label: spare_label(spare_index),
        }
    }

    pub fn is_spare(&self) -> bool {
        matches!(self.container, TireContainer::Spare { .. })
    }

    pub fn axle_id(&self) -> Option<&str> {
        match &self.container {
            TireContainer::AxleSlot { axle_id, .. } => Some(axle_id),
            TireContainer::Spare { .. } => None,
        }
    }

    pub fn slot_index(&self) -> Option<usize> {
        match self.container {
            TireContainer::AxleSlot { slot_index, .. } => Some(slot_index),
            TireContainer::Spare { .. } => None,
        }
    }

    /// 带轴号的完整标签,用于历史描述: "Axle 2 - Outer Left" / "Spare #1"
    pub fn qualified_label(&self) -> String {
        match self.container {
            TireContainer::AxleSlot { axle_index, .. } => {
                format!("Axle {} - {}", axle_index + 1, self.label)
            }
            TireContainer::Spare { .. } => self.label.clone(),
        }
    }

    /// 同一物理位置 (忽略轮胎ID)
    pub fn same_place(&self, other: &TireLocation) -> bool {
        self.container == other.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_axle_labels() {
        assert_eq!(slot_label(0, 2), "Left");
        assert_eq!(slot_label(1, 2), "Right");
    }

    #[test]
    fn test_dual_axle_labels() {
        let labels: Vec<String> = (0..4).map(|i| slot_label(i, 4)).collect();
        assert_eq!(labels, vec!["Outer Left", "Inner Left", "Inner Right", "Outer Right"]);
    }

    #[test]
    fn test_unusual_slot_count_label() {
        assert_eq!(slot_label(4, 6), "Slot 5");
    }

    #[test]
    fn test_spare_label_is_one_based() {
        assert_eq!(spare_label(0), "Spare #1");
        assert_eq!(spare_label(2), "Spare #3");
    }

    #[test]
    fn test_qualified_label() {
        let loc = TireLocation::axle_slot("PNEU-1-0", 1, "axle-2", 0, 4);
        assert_eq!(loc.label, "Outer Left");
        assert_eq!(loc.qualified_label(), "Axle 2 - Outer Left");
        assert_eq!(loc.axle_id(), Some("axle-2"));

        let spare = TireLocation::spare("STP-0", 0);
        assert!(spare.is_spare());
        assert_eq!(spare.qualified_label(), "Spare #1");
        assert_eq!(spare.slot_index(), None);
    }
}
