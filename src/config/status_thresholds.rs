use serde::{Deserialize, Serialize};

/// 轮胎状态判定阈值
///
/// 默认值即现行规则:
/// - CRITICAL: 行驶 > 120000 km / 翻新 > 2 次 / 花纹 < 3 mm (或结构损伤)
/// - GOOD(半寿命): 行驶 > 40000 km / 翻新 ≥ 1 次 / 花纹 < 8 mm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// 危险里程 (严格大于)
    #[serde(default = "default_critical_km_run")]
    pub critical_km_run: f64,

    /// 危险翻新次数 (严格大于)
    #[serde(default = "default_critical_retread_count")]
    pub critical_retread_count: usize,

    /// 危险花纹深度 (严格小于)
    #[serde(default = "default_critical_tread_mm")]
    pub critical_tread_mm: f64,

    /// 半寿命里程 (严格大于)
    #[serde(default = "default_half_life_km_run")]
    pub half_life_km_run: f64,

    /// 半寿命花纹深度 (严格小于)
    #[serde(default = "default_half_life_tread_mm")]
    pub half_life_tread_mm: f64,
}

fn default_critical_km_run() -> f64 {
    120_000.0
}

fn default_critical_retread_count() -> usize {
    2
}

fn default_critical_tread_mm() -> f64 {
    3.0
}

fn default_half_life_km_run() -> f64 {
    40_000.0
}

fn default_half_life_tread_mm() -> f64 {
    8.0
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            critical_km_run: default_critical_km_run(),
            critical_retread_count: default_critical_retread_count(),
            critical_tread_mm: default_critical_tread_mm(),
            half_life_km_run: default_half_life_km_run(),
            half_life_tread_mm: default_half_life_tread_mm(),
        }
    }
}

impl StatusThresholds {
    /// 校验阈值
    ///
    /// 返回错误描述列表 (空表示合法)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, v) in [
            ("critical_km_run", self.critical_km_run),
            ("critical_tread_mm", self.critical_tread_mm),
            ("half_life_km_run", self.half_life_km_run),
            ("half_life_tread_mm", self.half_life_tread_mm),
        ] {
            if !v.is_finite() || v < 0.0 {
                errors.push(format!("{} 必须为非负有限数: {}", name, v));
            }
        }

        if self.critical_tread_mm > self.half_life_tread_mm {
            errors.push(format!(
                "critical_tread_mm({}) 不能大于 half_life_tread_mm({})",
                self.critical_tread_mm, self.half_life_tread_mm
            ));
        }

        errors
    }
}
