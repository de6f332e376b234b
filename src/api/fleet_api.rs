// ==========================================
// RODDAR 轮胎管理系统 - 车队 API
// ==========================================
// 职责: 面向 UI 的用例接口 (查询 / 轮换 / 维护 / 行程 / 登记)
// 红线: 每个写操作在该车辆的锁内完成 "读取-引擎变换-写回"
// 红线: 已提交的写操作记录 ActionLog 并发布事件; 空操作不记录
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::FleetConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::position::TireLocation;
use crate::domain::tire::TirePatch;
use crate::domain::trip::{TripDraft, TripPatch};
use crate::domain::truck::{Owner, Truck};
use crate::domain::types::MaintenanceKind;
use crate::engine::{
    AxleSelector, FleetEvent, FleetEventType, FleetReport, FleetReportEngine, MaintenanceEngine,
    OnboardingEngine, OptionalEventPublisher, RotationEngine, RotationOutcome, SlotOption,
    TireLocator, TireStatusEngine, TireUpdateOutcome, TripCompletion, TripEngine,
    TruckRegistration, TruckSettings,
};
use crate::repository::{ActionLogRepository, FleetRepository};

// ==========================================
// FleetApi - 车队 API
// ==========================================

/// 车队API
///
/// 职责：
/// 1. 车辆/轮胎查询、报表
/// 2. 手动换位、X 轮换
/// 3. 维护事件、气压、花纹深度、轮胎资料
/// 4. 行程开始/修改/完成
/// 5. ActionLog 记录 + 事件发布
pub struct FleetApi {
    fleet_repo: Arc<FleetRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    event_publisher: OptionalEventPublisher,
    locator: TireLocator,
    status_engine: TireStatusEngine,
    rotation_engine: RotationEngine,
    trip_engine: TripEngine,
    maintenance_engine: MaintenanceEngine,
    onboarding_engine: OnboardingEngine,
    report_engine: FleetReportEngine,
    fallback_axle_index: usize,
    default_actor: String,
}

impl FleetApi {
    /// 创建 FleetApi (阈值等参数从配置读取)
    pub fn new(
        fleet_repo: Arc<FleetRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: &dyn FleetConfigReader,
        event_publisher: OptionalEventPublisher,
    ) -> ApiResult<Self> {
        let config_err = |e: Box<dyn std::error::Error>| ApiError::InternalError(format!("配置读取失败: {}", e));
        let thresholds = config.get_status_thresholds().map_err(config_err)?;
        let fallback_axle_index = config.get_rotation_fallback_axle_index().map_err(config_err)?;
        let default_actor = config.get_default_actor().map_err(config_err)?;

        let status_engine = TireStatusEngine::with_thresholds(thresholds);
        Ok(Self {
            fleet_repo,
            action_log_repo,
            event_publisher,
            locator: TireLocator::new(),
            rotation_engine: RotationEngine::new(),
            trip_engine: TripEngine::new(status_engine.clone()),
            maintenance_engine: MaintenanceEngine::new(status_engine.clone()),
            onboarding_engine: OnboardingEngine::new(status_engine.clone()),
            report_engine: FleetReportEngine::new(status_engine.clone(), fallback_axle_index),
            status_engine,
            fallback_axle_index,
            default_actor,
        })
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn actor<'a>(&'a self, actor: &'a str) -> &'a str {
        if actor.trim().is_empty() {
            &self.default_actor
        } else {
            actor
        }
    }

    /// 写入操作日志 (失败只告警,不影响已提交的修改)
    fn record_action(&self, log: ActionLog) {
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, action_type = %log.action_type, "记录操作日志失败");
        }
    }

    /// 发布事件 (失败只告警)
    fn publish(&self, event: FleetEvent) {
        let event_type = event.event_type;
        if let Err(e) = self.event_publisher.publish(event) {
            warn!(error = %e, event_type = event_type.as_str(), "事件发布失败");
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn get_truck(&self, truck_id: &str) -> ApiResult<Truck> {
        Ok(self.fleet_repo.get(truck_id)?)
    }

    pub fn list_trucks(&self) -> ApiResult<Vec<Truck>> {
        Ok(self.fleet_repo.list_all()?)
    }

    /// 定位轮胎 (找不到返回 None)
    pub fn locate_tire(&self, truck_id: &str, tire_id: &str) -> ApiResult<Option<TireLocation>> {
        let truck = self.fleet_repo.get(truck_id)?;
        Ok(self.locator.locate(&truck, tire_id))
    }

    /// 换位候选列表
    pub fn rotation_options(&self, truck_id: &str, tire_id: &str) -> ApiResult<Vec<SlotOption>> {
        let truck = self.fleet_repo.get(truck_id)?;
        Ok(self.locator.rotation_options(&truck, tire_id))
    }

    /// 单车报表
    pub fn fleet_report(&self, truck_id: &str) -> ApiResult<FleetReport> {
        let truck = self.fleet_repo.get(truck_id)?;
        Ok(self.report_engine.build(&truck, Self::now()))
    }

    /// 车辆上下文摘要 (顾问能力输入)
    pub fn truck_context_summary(&self, truck_id: &str) -> ApiResult<String> {
        let truck = self.fleet_repo.get(truck_id)?;
        Ok(self.report_engine.truck_context_summary(&truck))
    }

    /// 车辆操作日志 (新的在前)
    pub fn action_logs(&self, truck_id: &str) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.find_by_truck_id(truck_id)?)
    }

    // ==========================================
    // 车辆登记与资料
    // ==========================================

    /// 按车轴布局登记车辆
    pub fn register_truck(&self, registration: &TruckRegistration, actor: &str) -> ApiResult<Truck> {
        let truck = self.onboarding_engine.register(registration)?;
        self.fleet_repo.insert(truck.clone())?;
        self.after_register(&truck, actor, "onboarding");
        Ok(truck)
    }

    /// 导入已有车辆快照 (例如从 JSON 文件)
    ///
    /// 先校验快照 (行程、里程、花纹、轮胎ID唯一),失败时不写入;
    /// 通过后重算全部轮胎状态
    pub fn import_truck(&self, truck: Truck, actor: &str) -> ApiResult<Truck> {
        if truck.id.trim().is_empty() {
            return Err(ApiError::ValidationError("车辆ID不能为空".to_string()));
        }
        self.onboarding_engine.validate_snapshot(&truck)?;
        let (truck, changes) = self.status_engine.reclassify_truck(&truck);
        if !changes.is_empty() {
            debug!(truck_id = %truck.id, changes = changes.len(), "导入时修正了轮胎状态");
        }
        self.fleet_repo.insert(truck.clone())?;
        self.after_register(&truck, actor, "import");
        Ok(truck)
    }

    fn after_register(&self, truck: &Truck, actor: &str, source: &str) {
        info!(truck_id = %truck.id, plate = %truck.plate, source, "车辆已登记");
        self.record_action(
            ActionLog::new(&truck.id, ActionType::RegisterTruck, self.actor(actor), Self::now())
                .with_payload(json!({
                    "plate": truck.plate,
                    "model": truck.model,
                    "axles": truck.axles.len(),
                    "spares": truck.spares.len(),
                    "source": source,
                }))
                .with_detail(format!("登记车辆 {}", truck.plate)),
        );
        self.publish(
            FleetEvent::truck_wide(&truck.id, FleetEventType::TruckRegistered).with_source(source),
        );
    }

    /// 修改车牌/车型/里程表
    pub fn update_truck_settings(
        &self,
        truck_id: &str,
        settings: &TruckSettings,
        actor: &str,
    ) -> ApiResult<Truck> {
        let truck = self.fleet_repo.update(truck_id, |truck| {
            let next = self.onboarding_engine.update_settings(truck, settings)?;
            Ok::<_, ApiError>((next.clone(), next))
        })?;

        info!(truck_id, "车辆资料已更新");
        self.record_action(
            ActionLog::new(truck_id, ActionType::UpdateTruckSettings, self.actor(actor), Self::now())
                .with_payload(json!(settings)),
        );
        Ok(truck)
    }

    /// 修改车主资料
    pub fn update_owner(&self, truck_id: &str, owner: &Owner, actor: &str) -> ApiResult<Truck> {
        let truck = self.fleet_repo.update(truck_id, |truck| {
            let next = self.onboarding_engine.update_owner(truck, owner)?;
            Ok::<_, ApiError>((next.clone(), next))
        })?;

        info!(truck_id, "车主资料已更新");
        self.record_action(
            ActionLog::new(truck_id, ActionType::UpdateOwner, self.actor(actor), Self::now())
                .with_payload(json!(owner)),
        );
        Ok(truck)
    }

    // ==========================================
    // 轮换
    // ==========================================

    /// 手动换位 (任一轮胎找不到 → 空操作,applied=false)
    pub fn swap_tires(
        &self,
        truck_id: &str,
        tire_a: &str,
        tire_b: &str,
        actor: &str,
    ) -> ApiResult<RotationOutcome> {
        let now = Self::now();
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self.rotation_engine.swap(truck, tire_a, tire_b, now);
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        if !outcome.applied() {
            debug!(truck_id, tire_a, tire_b, "换位未生效: 轮胎未找到或相同");
            return Ok(outcome);
        }

        info!(truck_id, tire_a, tire_b, "手动换位完成");
        self.after_rotation(truck_id, ActionType::SwapTires, &outcome, actor);
        Ok(outcome)
    }

    /// X 型自动轮换 (驱动轴优先,否则配置的备用轴)
    pub fn auto_rotate(&self, truck_id: &str, actor: &str) -> ApiResult<RotationOutcome> {
        self.auto_rotate_axle(
            truck_id,
            &AxleSelector::TractionOrFallback(self.fallback_axle_index),
            actor,
        )
    }

    /// X 型轮换指定车轴
    pub fn auto_rotate_axle(
        &self,
        truck_id: &str,
        selector: &AxleSelector,
        actor: &str,
    ) -> ApiResult<RotationOutcome> {
        let now = Self::now();
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self.rotation_engine.x_rotate(truck, selector, now)?;
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        if outcome.applied() {
            self.after_rotation(truck_id, ActionType::AutoRotation, &outcome, actor);
        }
        Ok(outcome)
    }

    fn after_rotation(
        &self,
        truck_id: &str,
        action_type: ActionType,
        outcome: &RotationOutcome,
        actor: &str,
    ) {
        let moves: Vec<_> = outcome
            .moves
            .iter()
            .map(|m| {
                json!({
                    "tire_id": m.tire_id,
                    "from": m.from.qualified_label(),
                    "to": m.to.qualified_label(),
                })
            })
            .collect();
        self.record_action(
            ActionLog::new(truck_id, action_type, self.actor(actor), outcome.rotated_at)
                .with_payload(json!({ "moves": moves })),
        );
        self.publish(FleetEvent::for_tires(
            truck_id,
            FleetEventType::TiresRotated,
            outcome.moves.iter().map(|m| m.tire_id.clone()).collect(),
        ));
    }

    // ==========================================
    // 维护
    // ==========================================

    /// 登记维护事件
    pub fn record_occurrence(
        &self,
        truck_id: &str,
        tire_id: &str,
        kind: MaintenanceKind,
        description: &str,
        cost: f64,
        actor: &str,
    ) -> ApiResult<TireUpdateOutcome> {
        let now = Self::now();
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self
                .maintenance_engine
                .record_occurrence(truck, tire_id, kind, description, cost, now)?;
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        self.after_tire_update(
            truck_id,
            ActionType::RecordOccurrence,
            &outcome,
            json!({ "kind": kind, "description": description, "cost": cost }),
            actor,
        );
        Ok(outcome)
    }

    /// 气压调整
    pub fn record_pressure(
        &self,
        truck_id: &str,
        tire_id: &str,
        pressure_psi: f64,
        actor: &str,
    ) -> ApiResult<TireUpdateOutcome> {
        let now = Self::now();
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self
                .maintenance_engine
                .record_pressure(truck, tire_id, pressure_psi, now)?;
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        self.after_tire_update(
            truck_id,
            ActionType::RecordPressure,
            &outcome,
            json!({ "pressure_psi": pressure_psi }),
            actor,
        );
        Ok(outcome)
    }

    /// 更新花纹深度
    pub fn apply_tread_depth(
        &self,
        truck_id: &str,
        tire_id: &str,
        tread_depth_mm: f64,
        actor: &str,
    ) -> ApiResult<TireUpdateOutcome> {
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self
                .maintenance_engine
                .apply_tread_depth(truck, tire_id, tread_depth_mm)?;
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        self.after_tire_update(
            truck_id,
            ActionType::ApplyTreadDepth,
            &outcome,
            json!({ "tread_depth_mm": tread_depth_mm }),
            actor,
        );
        Ok(outcome)
    }

    /// 修改轮胎资料
    pub fn update_tire_details(
        &self,
        truck_id: &str,
        tire_id: &str,
        patch: &TirePatch,
        actor: &str,
    ) -> ApiResult<TireUpdateOutcome> {
        if patch.is_empty() {
            return Err(ApiError::ValidationError("没有需要修改的字段".to_string()));
        }
        let outcome = self.fleet_repo.update(truck_id, |truck| {
            let outcome = self.maintenance_engine.update_tire_details(truck, tire_id, patch)?;
            Ok::<_, ApiError>((outcome.truck.clone(), outcome))
        })?;

        self.after_tire_update(truck_id, ActionType::UpdateTireDetails, &outcome, json!(patch), actor);
        Ok(outcome)
    }

    fn after_tire_update(
        &self,
        truck_id: &str,
        action_type: ActionType,
        outcome: &TireUpdateOutcome,
        mut payload: serde_json::Value,
        actor: &str,
    ) {
        if !outcome.applied {
            debug!(truck_id, tire_id = %outcome.tire_id, %action_type, "轮胎未找到,操作未生效");
            return;
        }

        payload["tire_id"] = json!(outcome.tire_id);
        if let Some(change) = &outcome.status_change {
            payload["status_change"] = json!(change);
            info!(
                truck_id,
                tire_id = %outcome.tire_id,
                from = %change.from,
                to = %change.to,
                "轮胎状态变化"
            );
        }

        self.record_action(
            ActionLog::new(truck_id, action_type, self.actor(actor), Self::now()).with_payload(payload),
        );
        self.publish(FleetEvent::for_tires(
            truck_id,
            FleetEventType::TireUpdated,
            vec![outcome.tire_id.clone()],
        ));
    }

    // ==========================================
    // 行程
    // ==========================================

    /// 开始行程
    pub fn start_trip(&self, truck_id: &str, draft: &TripDraft, actor: &str) -> ApiResult<Truck> {
        let truck = self.fleet_repo.update(truck_id, |truck| {
            let next = self.trip_engine.start_trip(truck, draft)?;
            Ok::<_, ApiError>((next.clone(), next))
        })?;

        if let Some(trip) = &truck.active_trip {
            info!(truck_id, trip_id = %trip.id, distance_km = trip.distance_km, "行程开始");
            self.record_action(
                ActionLog::new(truck_id, ActionType::StartTrip, self.actor(actor), Self::now())
                    .with_payload(json!(trip)),
            );
        }
        self.publish(FleetEvent::truck_wide(truck_id, FleetEventType::TripStarted));
        Ok(truck)
    }

    /// 修改进行中行程
    pub fn edit_active_trip(&self, truck_id: &str, patch: &TripPatch, actor: &str) -> ApiResult<Truck> {
        let truck = self.fleet_repo.update(truck_id, |truck| {
            let next = self.trip_engine.edit_active_trip(truck, patch)?;
            Ok::<_, ApiError>((next.clone(), next))
        })?;

        self.record_action(
            ActionLog::new(truck_id, ActionType::EditTrip, self.actor(actor), Self::now())
                .with_payload(json!(patch)),
        );
        Ok(truck)
    }

    /// 完成行程 (里程累计 + 状态重算)
    pub fn complete_trip(&self, truck_id: &str, actor: &str) -> ApiResult<TripCompletion> {
        let now = Self::now();
        let completion = self.fleet_repo.update(truck_id, |truck| {
            let completion = self.trip_engine.complete_trip(truck, now)?;
            Ok::<_, ApiError>((completion.truck.clone(), completion))
        })?;

        self.record_action(
            ActionLog::new(truck_id, ActionType::CompleteTrip, self.actor(actor), now)
                .with_payload(json!({
                    "trip_id": completion.trip.id,
                    "distance_km": completion.trip.distance_km,
                    "total_km": completion.truck.total_km,
                    "status_changes": completion.status_changes,
                }))
                .with_detail(format!(
                    "{} → {}",
                    completion.trip.origin, completion.trip.destination
                )),
        );
        self.publish(FleetEvent::truck_wide(truck_id, FleetEventType::TripCompleted));
        Ok(completion)
    }
}
