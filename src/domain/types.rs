// ==========================================
// RODDAR 轮胎管理系统 - 领域类型定义
// ==========================================
// 职责: 轮胎状态、维护事件类型、车轴类型、行程状态
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 轮胎状态 (Tire Status)
// ==========================================
// 红线: 状态是派生值,只能由 TireStatusEngine 计算
// 顺序: New < Good < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TireStatus {
    New,      // 新胎
    Good,     // 半寿命 (half-life)
    Warning,  // 保留值,当前规则不会产生
    Critical, // 危险
}

impl fmt::Display for TireStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TireStatus::New => write!(f, "NEW"),
            TireStatus::Good => write!(f, "GOOD"),
            TireStatus::Warning => write!(f, "WARNING"),
            TireStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl TireStatus {
    /// 从字符串解析状态
    ///
    /// 未知值返回 None（不猜测）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Some(TireStatus::New),
            "GOOD" | "HALF_LIFE" => Some(TireStatus::Good),
            "WARNING" => Some(TireStatus::Warning),
            "CRITICAL" => Some(TireStatus::Critical),
            _ => None,
        }
    }
}

// ==========================================
// 维护事件类型 (Maintenance Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceKind {
    Puncture,       // 扎胎
    Bubble,         // 鼓包 (结构损伤)
    IrregularWear,  // 偏磨
    Retread,        // 翻新
    Rotation,       // 轮换
    Pressure,       // 气压调整
    Other,          // 其他
    Cut,            // 胎侧割伤 (结构损伤)
    Blowout,        // 爆胎 (结构损伤)
}

impl MaintenanceKind {
    /// 是否为结构损伤（鼓包/爆胎/割伤）
    pub fn is_structural_damage(&self) -> bool {
        matches!(
            self,
            MaintenanceKind::Bubble | MaintenanceKind::Blowout | MaintenanceKind::Cut
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Puncture => "PUNCTURE",
            MaintenanceKind::Bubble => "BUBBLE",
            MaintenanceKind::IrregularWear => "IRREGULAR_WEAR",
            MaintenanceKind::Retread => "RETREAD",
            MaintenanceKind::Rotation => "ROTATION",
            MaintenanceKind::Pressure => "PRESSURE",
            MaintenanceKind::Other => "OTHER",
            MaintenanceKind::Cut => "CUT",
            MaintenanceKind::Blowout => "BLOWOUT",
        }
    }
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 车轴类型 (Axle Type)
// ==========================================
// 仅描述用途;唯一参与逻辑的是 X 轮换按 Traction 选轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxleType {
    Front,    // 转向轴
    Traction, // 驱动轴
    Truck,    // 随动轴
    Trailer,  // 挂车轴
}

impl fmt::Display for AxleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxleType::Front => write!(f, "FRONT"),
            AxleType::Traction => write!(f, "TRACTION"),
            AxleType::Truck => write!(f, "TRUCK"),
            AxleType::Trailer => write!(f, "TRAILER"),
        }
    }
}

// ==========================================
// 行程状态 (Trip Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Active,    // 进行中
    Completed, // 已完成
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripStatus::Active => write!(f, "ACTIVE"),
            TripStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_damage_kinds() {
        assert!(MaintenanceKind::Bubble.is_structural_damage());
        assert!(MaintenanceKind::Blowout.is_structural_damage());
        assert!(MaintenanceKind::Cut.is_structural_damage());
        assert!(!MaintenanceKind::Puncture.is_structural_damage());
        assert!(!MaintenanceKind::Retread.is_structural_damage());
        assert!(!MaintenanceKind::Rotation.is_structural_damage());
    }

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&TireStatus::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let kind: MaintenanceKind = serde_json::from_str("\"IRREGULAR_WEAR\"").unwrap();
        assert_eq!(kind, MaintenanceKind::IrregularWear);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TireStatus::parse("half_life"), Some(TireStatus::Good));
        assert_eq!(TireStatus::parse(" critical "), Some(TireStatus::Critical));
        assert_eq!(TireStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_status_ordering() {
        assert!(TireStatus::New < TireStatus::Good);
        assert!(TireStatus::Warning < TireStatus::Critical);
    }
}
