// ==========================================
// RODDAR 轮胎管理系统 - 车队数据仓储
// ==========================================
// 存储: 进程内; 每辆车一把锁
// 红线: 同一辆车的"定位-修改"串行执行
// 红线: update 闭包返回错误时不写回 (原快照保持)
// ==========================================

use crate::domain::truck::Truck;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

type TruckSlot = Arc<Mutex<Truck>>;

// ==========================================
// FleetRepository - 车队仓储
// ==========================================
#[derive(Default)]
pub struct FleetRepository {
    trucks: RwLock<BTreeMap<String, TruckSlot>>,
}

impl FleetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, truck_id: &str) -> RepositoryResult<TruckSlot> {
        let trucks = self
            .trucks
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        trucks
            .get(truck_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Truck".to_string(),
                id: truck_id.to_string(),
            })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 新增车辆 (ID 重复报错)
    pub fn insert(&self, truck: Truck) -> RepositoryResult<()> {
        let mut trucks = self
            .trucks
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        if trucks.contains_key(&truck.id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "truck_id={}",
                truck.id
            )));
        }
        trucks.insert(truck.id.clone(), Arc::new(Mutex::new(truck)));
        Ok(())
    }

    /// 在车辆锁内执行修改
    ///
    /// 闭包收到当前快照,返回 (新快照, 结果); 仅 Ok 时写回
    /// 车辆不存在 → RepositoryError::NotFound (经 From 转为 E)
    pub fn update<T, E, F>(&self, truck_id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&Truck) -> Result<(Truck, T), E>,
        E: From<RepositoryError>,
    {
        let slot = self.slot(truck_id)?;
        let mut guard = slot
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let (next, value) = f(&guard)?;
        *guard = next;
        Ok(value)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按ID读取快照
    pub fn find_by_id(&self, truck_id: &str) -> RepositoryResult<Option<Truck>> {
        match self.slot(truck_id) {
            Ok(slot) => {
                let guard = slot
                    .lock()
                    .map_err(|e| RepositoryError::LockError(e.to_string()))?;
                Ok(Some(guard.clone()))
            }
            Err(RepositoryError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 按ID读取快照,不存在报错
    pub fn get(&self, truck_id: &str) -> RepositoryResult<Truck> {
        let slot = self.slot(truck_id)?;
        let guard = slot
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    /// 全部车辆 (按ID排序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Truck>> {
        let slots: Vec<TruckSlot> = {
            let trucks = self
                .trucks
                .read()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            trucks.values().cloned().collect()
        };
        slots
            .iter()
            .map(|slot| {
                slot.lock()
                    .map(|guard| guard.clone())
                    .map_err(|e| RepositoryError::LockError(e.to_string()))
            })
            .collect()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let trucks = self
            .trucks
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(trucks.len())
    }
}
