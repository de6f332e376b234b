// ==========================================
// RODDAR 轮胎管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ExternalApi, FleetApi};
use crate::config::{ConfigManager, FleetConfigReader};
use crate::engine::{FleetEventPublisher, OptionalEventPublisher};
use crate::repository::{ActionLogRepository, FleetRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 配置文件路径 (不存在时使用默认配置)
    pub config_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 车队API
    pub fleet_api: Arc<FleetApi>,

    /// 外部能力API (默认不挂载任何能力)
    pub external_api: Arc<ExternalApi>,

    /// 车队仓储
    pub fleet_repo: Arc<FleetRepository>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 加载配置 (文件不存在时全部走默认值)
    /// 2. 初始化仓储
    /// 3. 创建 API 实例
    pub fn new(config_path: String) -> Result<Self, String> {
        Self::with_event_publisher(config_path, None)
    }

    /// 创建AppState并挂载事件发布器
    pub fn with_event_publisher(
        config_path: String,
        publisher: Option<Arc<dyn FleetEventPublisher>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，配置路径: {}", config_path);

        let config_manager = if Path::new(&config_path).exists() {
            ConfigManager::from_json_file(&config_path)
                .map_err(|e| format!("无法加载配置文件: {}", e))?
        } else {
            tracing::info!("配置文件不存在,使用默认配置");
            ConfigManager::new()
        };
        let config_manager = Arc::new(config_manager);

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let fleet_repo = Arc::new(FleetRepository::new());
        let action_log_repo = Arc::new(ActionLogRepository::new());

        // ==========================================
        // 初始化API层
        // ==========================================
        let event_publisher = match publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };
        let fleet_api = Arc::new(
            FleetApi::new(
                fleet_repo.clone(),
                action_log_repo.clone(),
                config_manager.as_ref(),
                event_publisher,
            )
            .map_err(|e| format!("无法创建FleetApi: {}", e))?,
        );

        let timeout_ms = config_manager
            .get_external_timeout_ms()
            .map_err(|e| format!("无法读取外部能力超时: {}", e))?;
        let external_api = Arc::new(ExternalApi::new(
            fleet_api.clone(),
            Duration::from_millis(timeout_ms),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config_path,
            config_manager,
            fleet_api,
            external_api,
            fleet_repo,
            action_log_repo,
        })
    }

    /// 替换外部能力API (挂载具体能力实现后调用)
    pub fn set_external_api(&mut self, external_api: ExternalApi) {
        self.external_api = Arc::new(external_api);
    }

    /// 获取配置路径
    pub fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

// ==========================================
// 默认配置路径辅助函数
// ==========================================

/// 获取默认配置路径
///
/// # 返回
/// - 环境变量 RODDAR_CONFIG_PATH (非空时)
/// - 否则: 用户配置目录/roddar/config.json
/// - 无法获取用户配置目录时: ./roddar_config.json
pub fn get_default_config_path() -> String {
    if let Ok(path) = std::env::var("RODDAR_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("roddar").join("config.json").to_string_lossy().to_string(),
        None => "./roddar_config.json".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_get_default_config_path() {
        let path = get_default_config_path();
        assert!(!path.is_empty());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let state = AppState::new(path.to_string_lossy().to_string()).unwrap();
        assert_eq!(state.fleet_repo.count().unwrap(), 0);
        assert_eq!(state.get_config_path(), path.to_string_lossy());
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"external_timeout_ms": 250, "default_actor": "oficina"}}"#).unwrap();

        let state = AppState::new(file.path().to_string_lossy().to_string()).unwrap();
        assert_eq!(state.config_manager.get_external_timeout_ms().unwrap(), 250);
        assert_eq!(state.config_manager.get_default_actor().unwrap(), "oficina");
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"status_half_life_tread_mm": 1.0, "status_critical_tread_mm": 3.0}}"#
        )
        .unwrap();
        assert!(AppState::new(file.path().to_string_lossy().to_string()).is_err());
    }
}
