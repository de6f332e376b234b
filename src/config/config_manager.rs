// ==========================================
// RODDAR 轮胎管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、快照
// 存储: 进程内 key-value (global scope),可从 JSON 文件加载
// ==========================================

use crate::config::fleet_config_trait::FleetConfigReader;
use crate::config::status_thresholds::StatusThresholds;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: Mutex<BTreeMap<String, String>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// 创建空配置（所有读取走默认值）
    pub fn new() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
        }
    }

    /// 从键值表创建
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件内容为 JSON 对象; 非字符串值按 JSON 文本保存
    /// (例如 `{"status_critical_km": 100000}` 保存为 "100000")
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("读取配置文件失败 {}: {}", path.display(), e))?;
        let manager = Self::new();
        let count = manager.restore_from_snapshot(&raw)?;
        tracing::info!("配置文件已加载: path={}, keys={}", path.display(), count);
        Ok(manager)
    }

    /// 读取配置值（scope=global）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(values.get(key).cloned())
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值; 缺失用默认值,格式错误返回错误
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| format!("配置项格式错误 key={}, value={}: {}", key, raw, e).into()),
            None => Ok(default),
        }
    }

    /// 写入配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }
        let mut values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        values.insert(key.to_string(), value.to_string());
        tracing::debug!("配置已更新: key={}, value={}", key, value);
        Ok(())
    }

    /// 列出全部已设置的配置（按键排序）
    pub fn list_configs(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// 获取所有配置的快照（JSON格式,按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(serde_json::to_string(&*values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// 快照必须是 JSON 对象; 解析失败时不修改现有配置
    pub fn restore_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let parsed: JsonValue = serde_json::from_str(snapshot_json)?;
        let object = parsed
            .as_object()
            .ok_or("配置快照必须是 JSON 对象")?;

        let restored: BTreeMap<String, String> = object
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect();

        let count = restored.len();
        let mut values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        values.extend(restored);
        Ok(count)
    }
}

// ==========================================
// FleetConfigReader 实现
// ==========================================
impl FleetConfigReader for ConfigManager {
    fn get_status_thresholds(&self) -> Result<StatusThresholds, Box<dyn Error>> {
        let defaults = StatusThresholds::default();
        let thresholds = StatusThresholds {
            critical_km_run: self
                .get_parsed_or_default(config_keys::STATUS_CRITICAL_KM, defaults.critical_km_run)?,
            critical_retread_count: self.get_parsed_or_default(
                config_keys::STATUS_CRITICAL_RETREADS,
                defaults.critical_retread_count,
            )?,
            critical_tread_mm: self.get_parsed_or_default(
                config_keys::STATUS_CRITICAL_TREAD_MM,
                defaults.critical_tread_mm,
            )?,
            half_life_km_run: self
                .get_parsed_or_default(config_keys::STATUS_HALF_LIFE_KM, defaults.half_life_km_run)?,
            half_life_tread_mm: self.get_parsed_or_default(
                config_keys::STATUS_HALF_LIFE_TREAD_MM,
                defaults.half_life_tread_mm,
            )?,
        };

        let errors = thresholds.validate();
        if !errors.is_empty() {
            return Err(format!("状态阈值配置非法: {}", errors.join("; ")).into());
        }
        Ok(thresholds)
    }

    fn get_rotation_fallback_axle_index(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::ROTATION_FALLBACK_AXLE_INDEX, 1)
    }

    fn get_external_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::EXTERNAL_TIMEOUT_MS, 15_000)
    }

    fn get_default_actor(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::DEFAULT_ACTOR, "driver")
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 轮胎状态阈值
    pub const STATUS_CRITICAL_KM: &str = "status_critical_km";
    pub const STATUS_CRITICAL_RETREADS: &str = "status_critical_retreads";
    pub const STATUS_CRITICAL_TREAD_MM: &str = "status_critical_tread_mm";
    pub const STATUS_HALF_LIFE_KM: &str = "status_half_life_km";
    pub const STATUS_HALF_LIFE_TREAD_MM: &str = "status_half_life_tread_mm";

    // 轮换
    pub const ROTATION_FALLBACK_AXLE_INDEX: &str = "rotation_fallback_axle_index";

    // 外部能力
    pub const EXTERNAL_TIMEOUT_MS: &str = "external_timeout_ms";

    // 审计
    pub const DEFAULT_ACTOR: &str = "default_actor";
}
