// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用环境
// ==========================================

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use roddar::api::FleetApi;
use roddar::config::ConfigManager;
use roddar::domain::truck::Truck;
use roddar::engine::{FleetEvent, FleetEventPublisher, OptionalEventPublisher};
use roddar::repository::{ActionLogRepository, FleetRepository};

/// 记录所有已发布事件的发布器
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<FleetEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<FleetEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl FleetEventPublisher for RecordingPublisher {
    fn publish(&self, event: FleetEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        Ok(format!("evt-{}", events.len()))
    }
}

/// API测试环境
pub struct ApiTestEnv {
    pub fleet_api: Arc<FleetApi>,
    pub fleet_repo: Arc<FleetRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub publisher: Arc<RecordingPublisher>,
}

impl ApiTestEnv {
    pub fn new() -> Self {
        Self::with_config(HashMap::new())
    }

    pub fn with_config(values: HashMap<String, String>) -> Self {
        let config = ConfigManager::from_map(values);
        let fleet_repo = Arc::new(FleetRepository::new());
        let action_log_repo = Arc::new(ActionLogRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());

        let fleet_api = FleetApi::new(
            fleet_repo.clone(),
            action_log_repo.clone(),
            &config,
            OptionalEventPublisher::with_publisher(publisher.clone()),
        )
        .expect("创建 FleetApi 失败");

        Self {
            fleet_api: Arc::new(fleet_api),
            fleet_repo,
            action_log_repo,
            publisher,
        }
    }

    /// 导入车辆并清空导入产生的日志/事件
    pub fn seed(&self, truck: Truck) -> Truck {
        let truck = self.fleet_api.import_truck(truck, "seed").expect("导入车辆失败");
        self.publisher.events.lock().unwrap().clear();
        truck
    }

    pub fn truck(&self, truck_id: &str) -> Truck {
        self.fleet_api.get_truck(truck_id).expect("车辆不存在")
    }
}
