// ==========================================
// 工程进度重算引擎 - 延误施加
// ==========================================
// 职责: 材料/资源延误事件入口
//       重排受影响任务 + 追加延误日志 + 触发里程碑聚合与联动
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::ProductivityTable;
use crate::domain::delay_log::DelayLogEntry;
use crate::engine::aggregate::{MilestoneAggregator, MilestoneUpdate};
use crate::engine::repositories::ScheduleRepositories;
use crate::engine::reschedule::{RescheduleRequest, RescheduleResult, TaskRescheduler};
use crate::repository::{DelayLogRepository, RepositoryResult, TaskRepository};

// ==========================================
// DelaySummary - 延误处理摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelaySummary {
    /// 重排后的任务投影
    pub task: RescheduleResult,
    /// 本次写入的延误日志ID
    pub delay_id: String,
    /// 所属里程碑的聚合结果 (任务未挂里程碑时为 None)
    pub milestone: Option<MilestoneUpdate>,
}

impl DelaySummary {
    /// 联动重排的后续里程碑数
    pub fn cascaded_count(&self) -> usize {
        self.milestone.as_ref().map_or(0, |m| m.cascaded.len())
    }
}

// ==========================================
// DelayApplicator - 延误施加引擎
// ==========================================
pub struct DelayApplicator {
    task_repo: Arc<TaskRepository>,
    delay_log_repo: Arc<DelayLogRepository>,
    rescheduler: TaskRescheduler,
    aggregator: MilestoneAggregator,
}

impl DelayApplicator {
    pub fn new(repos: &ScheduleRepositories, table: ProductivityTable) -> Self {
        Self {
            task_repo: repos.task_repo.clone(),
            delay_log_repo: repos.delay_log_repo.clone(),
            rescheduler: TaskRescheduler::new(repos.task_repo.clone(), table),
            aggregator: MilestoneAggregator::new(
                repos.milestone_repo.clone(),
                repos.task_repo.clone(),
            ),
        }
    }

    /// 施加一次延误
    ///
    /// # 算法
    /// 1. 读取任务 (日志快照取重排前的归属引用)
    /// 2. 以延误天数重排任务 (人数不变)
    /// 3. 追加延误日志 (冗余存储项目/里程碑引用)
    /// 4. 任务挂里程碑时: 聚合该里程碑并联动后续
    ///
    /// # 失败
    /// - NotFound: 任务不存在
    #[instrument(skip(self, reason), fields(task_id = %task_id, delay_days = delay_days))]
    pub fn apply(
        &self,
        task_id: &str,
        delay_days: i64,
        reason: &str,
    ) -> RepositoryResult<DelaySummary> {
        let task = self.task_repo.find_by_id(task_id)?;

        let request = RescheduleRequest {
            delay_days: Some(delay_days),
            ..Default::default()
        };
        let rescheduled = self.rescheduler.reschedule(task_id, &request)?;

        let entry = DelayLogEntry::snapshot(&task, delay_days, reason);
        self.delay_log_repo.insert(&entry)?;

        let milestone = match task.milestone_id.as_deref() {
            Some(milestone_id) => Some(self.aggregator.recalculate(milestone_id, true)?),
            None => None,
        };

        info!(
            delay_id = %entry.delay_id,
            new_end = %rescheduled.end_date,
            cascaded = milestone.as_ref().map_or(0, |m| m.cascaded.len()),
            "延误已施加"
        );

        Ok(DelaySummary {
            task: rescheduled,
            delay_id: entry.delay_id,
            milestone,
        })
    }
}
