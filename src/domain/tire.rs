// ==========================================
// RODDAR 轮胎管理系统 - 轮胎领域模型
// ==========================================
// 职责: 轮胎实体 + 维护记录
// 红线: history 只追加,不删除,不重排
// ==========================================

use crate::domain::types::{MaintenanceKind, TireStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 新胎默认花纹深度 (mm)
pub const DEFAULT_NEW_TREAD_MM: f64 = 18.0;

/// 默认胎压 (PSI)
pub const DEFAULT_PRESSURE_PSI: f64 = 110.0;

// ==========================================
// MaintenanceRecord - 维护记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,                  // 记录ID (uuid)
    pub recorded_at: NaiveDateTime,  // 发生时间
    pub kind: MaintenanceKind,       // 事件类型
    pub description: String,         // 描述
    pub cost: f64,                   // 费用
}

impl MaintenanceRecord {
    pub fn new(
        kind: MaintenanceKind,
        description: impl Into<String>,
        cost: f64,
        recorded_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recorded_at,
            kind,
            description: description.into(),
            cost,
        }
    }
}

// ==========================================
// Tire - 轮胎
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tire {
    // ===== 标识 =====
    pub id: String, // 火号 (fire number),人工分配,全局唯一

    // ===== 描述属性 =====
    pub brand: String,
    pub model: String,
    pub dot: String,  // 生产批号
    pub size: String,

    // ===== 采购属性 =====
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub store: Option<String>,

    // ===== 使用属性 =====
    pub initial_km: f64, // 装车时里程
    pub current_km: f64, // 当前里程 (>= initial_km)
    pub tread_depth_mm: f64,
    pub pressure_psi: f64,

    // ===== 派生/展示字段 =====
    pub position: String,   // 轮位标签,由轮换引擎覆盖,不作为定位依据
    pub status: TireStatus, // 派生状态,每次相关变更后重算

    // ===== 维护历史 (只追加) =====
    #[serde(default)]
    history: Vec<MaintenanceRecord>,
}

impl Tire {
    /// 创建新胎 (0 km, 18 mm, 110 PSI, NEW)
    pub fn new(id: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: String::new(),
            dot: String::new(),
            size: String::new(),
            purchase_date: None,
            purchase_price: 0.0,
            payment_method: None,
            store: None,
            initial_km: 0.0,
            current_km: 0.0,
            tread_depth_mm: DEFAULT_NEW_TREAD_MM,
            pressure_psi: DEFAULT_PRESSURE_PSI,
            position: String::new(),
            status: TireStatus::New,
            history: Vec::new(),
        }
    }

    pub fn with_km(mut self, initial_km: f64, current_km: f64) -> Self {
        self.initial_km = initial_km;
        self.current_km = current_km;
        self
    }

    pub fn with_tread_depth(mut self, tread_depth_mm: f64) -> Self {
        self.tread_depth_mm = tread_depth_mm;
        self
    }

    pub fn with_price(mut self, purchase_price: f64) -> Self {
        self.purchase_price = purchase_price;
        self
    }

    pub fn with_record(mut self, record: MaintenanceRecord) -> Self {
        self.push_record(record);
        self
    }

    /// 已行驶里程 (current_km - initial_km),最小为 0
    pub fn km_run(&self) -> f64 {
        (self.current_km - self.initial_km).max(0.0)
    }

    /// 翻新次数
    pub fn retread_count(&self) -> usize {
        self.history
            .iter()
            .filter(|r| r.kind == MaintenanceKind::Retread)
            .count()
    }

    /// 是否存在结构损伤记录
    pub fn has_structural_damage(&self) -> bool {
        self.history.iter().any(|r| r.kind.is_structural_damage())
    }

    /// 每公里成本 (CPK)
    ///
    /// 未行驶时按 1 km 计,避免除零
    pub fn cpk(&self) -> f64 {
        let km = self.km_run();
        if km > 0.0 {
            self.purchase_price / km
        } else {
            self.purchase_price
        }
    }

    /// 维护历史 (按追加顺序)
    pub fn history(&self) -> &[MaintenanceRecord] {
        &self.history
    }

    /// 追加维护记录
    pub fn push_record(&mut self, record: MaintenanceRecord) {
        self.history.push(record);
    }

    /// 最近一条记录
    pub fn last_record(&self) -> Option<&MaintenanceRecord> {
        self.history.last()
    }
}

// ==========================================
// TirePatch - 轮胎资料编辑
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TirePatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dot: Option<String>,
    pub size: Option<String>,
    pub purchase_price: Option<f64>,
    pub current_km: Option<f64>,
}

impl TirePatch {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.dot.is_none()
            && self.size.is_none()
            && self.purchase_price.is_none()
            && self.current_km.is_none()
    }
}
