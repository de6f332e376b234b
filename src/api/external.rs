// ==========================================
// RODDAR 轮胎管理系统 - 外部能力边界
// ==========================================
// 职责: 花纹深度估算 / 顾问问答 / 行程距离估算
// 红线: 外部能力均为可选; 失败或超时不修改任何状态
// 红线: 核心规则 (状态判定/轮换/行程) 不依赖外部能力
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::fleet_api::FleetApi;
use crate::engine::TireUpdateOutcome;

pub const CAPABILITY_TREAD_DEPTH: &str = "tread_depth";
pub const CAPABILITY_ADVISOR: &str = "advisor";
pub const CAPABILITY_DISTANCE: &str = "distance";

// ==========================================
// 边界数据
// ==========================================

/// 轮胎照片 (base64)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl TireImage {
    pub fn jpeg(base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            base64_data: base64_data.into(),
        }
    }
}

/// 花纹深度估算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreadDepthEstimate {
    pub estimated_depth_mm: f64,
    pub wear_percentage: f64, // 0 ~ 100, 100 = 磨平
    pub condition: String,
    pub recommendation: String,
}

impl TreadDepthEstimate {
    /// 解析外部服务返回的 JSON 文本
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let estimate: Self = serde_json::from_str(raw).context("花纹估算结果不是合法 JSON")?;
        estimate.validate()?;
        Ok(estimate)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.estimated_depth_mm.is_finite() || self.estimated_depth_mm < 0.0 {
            return Err(anyhow!(
                "花纹深度估算值非法: estimated_depth_mm={}",
                self.estimated_depth_mm
            ));
        }
        Ok(())
    }
}

// ==========================================
// 外部能力 Trait
// ==========================================

#[async_trait]
pub trait TreadDepthEstimator: Send + Sync {
    async fn estimate(&self, image: &TireImage) -> anyhow::Result<TreadDepthEstimate>;
}

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, query: &str, truck_context: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait DistanceEstimator: Send + Sync {
    /// 公路里程估算 (km); 0 表示无法估算
    async fn estimate_km(&self, origin: &str, destination: &str) -> anyhow::Result<u32>;
}

// ==========================================
// ExternalApi - 外部能力编排
// ==========================================
pub struct ExternalApi {
    fleet_api: Arc<FleetApi>,
    tread_estimator: Option<Arc<dyn TreadDepthEstimator>>,
    advisor: Option<Arc<dyn Advisor>>,
    distance_estimator: Option<Arc<dyn DistanceEstimator>>,
    timeout: Duration,
}

impl ExternalApi {
    pub fn new(fleet_api: Arc<FleetApi>, timeout: Duration) -> Self {
        Self {
            fleet_api,
            tread_estimator: None,
            advisor: None,
            distance_estimator: None,
            timeout,
        }
    }

    pub fn with_tread_estimator(mut self, estimator: Arc<dyn TreadDepthEstimator>) -> Self {
        self.tread_estimator = Some(estimator);
        self
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_distance_estimator(mut self, estimator: Arc<dyn DistanceEstimator>) -> Self {
        self.distance_estimator = Some(estimator);
        self
    }

    /// 带超时调用外部能力,错误统一转为 ExternalCapabilityFailure
    async fn call<T, F>(&self, capability: &str, fut: F) -> ApiResult<T>
    where
        F: std::future::Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(capability, error = %e, "外部能力调用失败");
                Err(ApiError::external(capability, format!("{:#}", e)))
            }
            Err(_) => {
                warn!(capability, timeout_ms = self.timeout.as_millis() as u64, "外部能力调用超时");
                Err(ApiError::external(
                    capability,
                    format!("timeout after {}ms", self.timeout.as_millis()),
                ))
            }
        }
    }

    /// 拍照估算花纹深度并写回轮胎
    ///
    /// 估算失败 → ExternalCapabilityFailure,轮胎花纹与状态保持不变
    pub async fn scan_tread_depth(
        &self,
        truck_id: &str,
        tire_id: &str,
        image: &TireImage,
        actor: &str,
    ) -> ApiResult<(TreadDepthEstimate, TireUpdateOutcome)> {
        // 先确认车辆存在,避免无意义的外部调用
        self.fleet_api.get_truck(truck_id)?;

        let estimator = self
            .tread_estimator
            .clone()
            .ok_or_else(|| ApiError::external(CAPABILITY_TREAD_DEPTH, "capability not configured"))?;
        let estimate = self
            .call(CAPABILITY_TREAD_DEPTH, async {
                let estimate = estimator.estimate(image).await?;
                estimate.validate()?;
                Ok::<_, anyhow::Error>(estimate)
            })
            .await?;

        info!(
            truck_id,
            tire_id,
            estimated_depth_mm = estimate.estimated_depth_mm,
            "花纹深度估算完成"
        );
        let outcome = self.fleet_api.apply_tread_depth(
            truck_id,
            tire_id,
            estimate.estimated_depth_mm,
            actor,
        )?;
        Ok((estimate, outcome))
    }

    /// 顾问问答 (只读)
    pub async fn ask_advisor(&self, truck_id: &str, query: &str) -> ApiResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::ValidationError("问题不能为空".to_string()));
        }
        let context = self.fleet_api.truck_context_summary(truck_id)?;

        let advisor = self
            .advisor
            .clone()
            .ok_or_else(|| ApiError::external(CAPABILITY_ADVISOR, "capability not configured"))?;
        self.call(CAPABILITY_ADVISOR, advisor.advise(query, &context)).await
    }

    /// 行程距离预估 (仅用于预填表单)
    ///
    /// 未配置或返回 0 → Ok(None)
    pub async fn estimate_trip_distance(&self, origin: &str, destination: &str) -> ApiResult<Option<u32>> {
        let Some(estimator) = self.distance_estimator.clone() else {
            return Ok(None);
        };
        let km = self
            .call(CAPABILITY_DISTANCE, estimator.estimate_km(origin, destination))
            .await?;
        Ok((km > 0).then_some(km))
    }
}
