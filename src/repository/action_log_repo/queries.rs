use super::core::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;

impl ActionLogRepository {
    // ==========================================
    // 查询操作 (结果按 action_ts 倒序)
    // ==========================================

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let logs = self.get_logs()?;
        Ok(logs.iter().find(|l| l.action_id == action_id).cloned())
    }

    /// 查询指定车辆的所有操作日志
    pub fn find_by_truck_id(&self, truck_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        self.select(|l| l.truck_id == truck_id)
    }

    /// 查询指定时间范围的操作日志 (闭区间)
    pub fn find_by_time_range(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> RepositoryResult<Vec<ActionLog>> {
        self.select(|l| l.action_ts >= start_time && l.action_ts <= end_time)
    }

    /// 查询指定操作人的日志
    pub fn find_by_actor(&self, actor: &str) -> RepositoryResult<Vec<ActionLog>> {
        self.select(|l| l.actor == actor)
    }

    /// 查询指定类型的日志
    pub fn find_by_action_type(&self, action_type: ActionType) -> RepositoryResult<Vec<ActionLog>> {
        self.select(|l| l.action_type == action_type)
    }

    /// 最近 limit 条日志
    pub fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let mut logs = self.select(|_| true)?;
        logs.truncate(limit);
        Ok(logs)
    }

    /// 日志总数
    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.get_logs()?.len())
    }

    fn select<F>(&self, predicate: F) -> RepositoryResult<Vec<ActionLog>>
    where
        F: Fn(&ActionLog) -> bool,
    {
        let logs = self.get_logs()?;
        let mut selected: Vec<ActionLog> = logs.iter().filter(|l| predicate(l)).cloned().collect();
        // 同一时刻的日志保持插入逆序
        selected.reverse();
        selected.sort_by(|a, b| b.action_ts.cmp(&a.action_ts));
        Ok(selected)
    }
}
