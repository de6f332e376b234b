// ==========================================
// RODDAR 轮胎管理系统 - 轮胎状态判定引擎
// ==========================================
// 红线: 状态是"等级制",按优先级命中即返回
// 红线: 纯函数,无副作用,不缓存
// ==========================================
// 输入: Tire (里程、花纹深度、维护历史)
// 输出: TireStatus + 原因 JSON
// ==========================================

use crate::config::StatusThresholds;
use crate::domain::position::TireLocation;
use crate::domain::tire::Tire;
use crate::domain::truck::Truck;
use crate::domain::types::TireStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

/// 按默认阈值判定
pub fn classify(tire: &Tire) -> TireStatus {
    TireStatusEngine::new().classify(tire)
}

// ==========================================
// StatusChange - 状态变化记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub tire_id: String,
    pub from: TireStatus,
    pub to: TireStatus,
}

// ==========================================
// TireStatusEngine - 轮胎状态判定引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TireStatusEngine {
    thresholds: StatusThresholds,
}

impl TireStatusEngine {
    /// 使用默认阈值创建
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: StatusThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定轮胎状态
    pub fn classify(&self, tire: &Tire) -> TireStatus {
        self.evaluate(tire).0
    }

    /// 判定轮胎状态并给出原因
    ///
    /// 顺序（优先级递减,CRITICAL 全部检查完才进入 GOOD）:
    /// 1) 结构损伤 / 里程 > critical_km_run / 翻新 > critical_retread_count
    ///    / 花纹 < critical_tread_mm → CRITICAL
    /// 2) 里程 > half_life_km_run / 翻新 ≥ 1 / 花纹 < half_life_tread_mm → GOOD
    /// 3) 默认 → NEW
    ///
    /// 返回: (TireStatus, reason_json)
    pub fn evaluate(&self, tire: &Tire) -> (TireStatus, String) {
        let t = &self.thresholds;
        let km_run = tire.km_run();
        let retreads = tire.retread_count();
        let tread = tire.tread_depth_mm;

        // 规则1: 危险
        let mut critical = Vec::new();
        if tire.has_structural_damage() {
            critical.push(("STRUCTURAL_DAMAGE", "history contains BUBBLE/BLOWOUT/CUT".to_string()));
        }
        if km_run > t.critical_km_run {
            critical.push(("KM_CRITICAL", format!("km_run={} > {}", km_run, t.critical_km_run)));
        }
        if retreads > t.critical_retread_count {
            critical.push((
                "RETREAD_CRITICAL",
                format!("retread_count={} > {}", retreads, t.critical_retread_count),
            ));
        }
        if tread < t.critical_tread_mm {
            critical.push(("TREAD_CRITICAL", format!("tread_depth_mm={} < {}", tread, t.critical_tread_mm)));
        }
        if !critical.is_empty() {
            return (TireStatus::Critical, self.reason(TireStatus::Critical, &critical, tire));
        }

        // 规则2: 半寿命
        let mut half_life = Vec::new();
        if km_run > t.half_life_km_run {
            half_life.push(("KM_HALF_LIFE", format!("km_run={} > {}", km_run, t.half_life_km_run)));
        }
        if retreads > 0 {
            half_life.push(("RETREADED", format!("retread_count={}", retreads)));
        }
        if tread < t.half_life_tread_mm {
            half_life.push((
                "TREAD_HALF_LIFE",
                format!("tread_depth_mm={} < {}", tread, t.half_life_tread_mm),
            ));
        }
        if !half_life.is_empty() {
            return (TireStatus::Good, self.reason(TireStatus::Good, &half_life, tire));
        }

        // 规则3: 默认新胎
        let normal = [("NORMAL", "no wear conditions".to_string())];
        (TireStatus::New, self.reason(TireStatus::New, &normal, tire))
    }

    /// 重算并写回轮胎状态
    ///
    /// 返回状态变化（无变化返回 None）
    pub fn reclassify(&self, tire: &mut Tire) -> Option<StatusChange> {
        let next = self.classify(tire);
        if next == tire.status {
            return None;
        }
        let change = StatusChange {
            tire_id: tire.id.clone(),
            from: tire.status,
            to: next,
        };
        tire.status = next;
        Some(change)
    }

    /// 整车重算（轴位 + 备胎）
    ///
    /// 只复制状态有变化的轮胎路径
    #[instrument(skip(self, truck), fields(truck_id = %truck.id))]
    pub fn reclassify_truck(&self, truck: &Truck) -> (Truck, Vec<StatusChange>) {
        let mut next = truck.clone();
        let mut changes = Vec::new();

        let mut stale = Vec::new();
        for (axle_index, axle) in truck.axles.iter().enumerate() {
            for (slot_index, tire) in axle.slots.iter().enumerate() {
                if let Some(tire) = tire {
                    if self.classify(tire) != tire.status {
                        stale.push(TireLocation::axle_slot(
                            tire.id.clone(),
                            axle_index,
                            axle.id.clone(),
                            slot_index,
                            axle.slot_count(),
                        ));
                    }
                }
            }
        }
        for (spare_index, tire) in truck.spares.iter().enumerate() {
            if self.classify(tire) != tire.status {
                stale.push(TireLocation::spare(tire.id.clone(), spare_index));
            }
        }

        for location in &stale {
            if let Some(tire) = next.tire_mut(location) {
                changes.extend(self.reclassify(tire));
            }
        }

        if !changes.is_empty() {
            tracing::debug!("整车重算: {} 条状态变化", changes.len());
        }
        (next, changes)
    }

    fn reason(&self, status: TireStatus, factors: &[(&str, String)], tire: &Tire) -> String {
        json!({
            "status": status.to_string(),
            "primary_reason": factors.first().map(|(code, _)| *code).unwrap_or("NORMAL"),
            "factors": factors.iter().map(|(_, f)| f.clone()).collect::<Vec<_>>(),
            "details": {
                "tire_id": tire.id,
                "km_run": tire.km_run(),
                "retread_count": tire.retread_count(),
                "tread_depth_mm": tire.tread_depth_mm,
            }
        })
        .to_string()
    }
}
