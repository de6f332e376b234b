use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::{Mutex, MutexGuard};

// ==========================================
// ActionLogRepository - 操作日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据存取
#[derive(Default)]
pub struct ActionLogRepository {
    logs: Mutex<Vec<ActionLog>>,
}

impl ActionLogRepository {
    /// 创建空的操作日志仓储
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn get_logs(&self) -> RepositoryResult<MutexGuard<'_, Vec<ActionLog>>> {
        self.logs
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入
    /// - `Err(UniqueConstraintViolation)`: action_id 重复
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let mut logs = self.get_logs()?;
        if logs.iter().any(|l| l.action_id == log.action_id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "action_id={}",
                log.action_id
            )));
        }
        logs.push(log.clone());
        Ok(log.action_id.clone())
    }

    /// 批量插入操作日志 (整体成功或整体失败)
    pub fn batch_insert(&self, batch: Vec<ActionLog>) -> RepositoryResult<usize> {
        let mut logs = self.get_logs()?;
        for (i, log) in batch.iter().enumerate() {
            let duplicated = logs.iter().any(|l| l.action_id == log.action_id)
                || batch[..i].iter().any(|l| l.action_id == log.action_id);
            if duplicated {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "action_id={}",
                    log.action_id
                )));
            }
        }
        let count = batch.len();
        logs.extend(batch);
        Ok(count)
    }
}
