// ==========================================
// 工程进度重算引擎 - 排期 API
// ==========================================
// 职责: 对外部事件源 (API 层 / 定时任务) 暴露钩子入口
// 约束: 引擎同进程内同步调用;并发触发的互斥由调用方负责
// ==========================================

use tracing::{info, instrument};

use crate::config::ProductivityTable;
use crate::engine::{
    DelayApplicator, DelaySummary, MilestoneAggregator, MilestoneUpdate, RebuildSummary,
    RescheduleRequest, RescheduleResult, ScheduleRebuilder, ScheduleRepositories, TaskRescheduler,
};
use crate::api::error::{ApiError, ApiResult};
use crate::repository::RepositoryResult;

// ==========================================
// ScheduleApi - 排期接口
// ==========================================
/// 排期接口
/// 持有全部引擎,是嵌入方唯一需要构造的对象
pub struct ScheduleApi {
    rescheduler: TaskRescheduler,
    applicator: DelayApplicator,
    aggregator: MilestoneAggregator,
    rebuilder: ScheduleRebuilder,
}

impl ScheduleApi {
    /// 以仓储集合与工效表构建
    pub fn new(repos: ScheduleRepositories, table: ProductivityTable) -> Self {
        Self {
            rescheduler: TaskRescheduler::new(repos.task_repo.clone(), table.clone()),
            applicator: DelayApplicator::new(&repos, table.clone()),
            aggregator: MilestoneAggregator::new(
                repos.milestone_repo.clone(),
                repos.task_repo.clone(),
            ),
            rebuilder: ScheduleRebuilder::new(
                repos.project_repo,
                repos.milestone_repo,
                repos.task_repo,
                table,
            ),
        }
    }

    /// 从数据库路径构建 (内置工效表)
    pub fn from_db_path(db_path: &str) -> RepositoryResult<Self> {
        let repos = ScheduleRepositories::from_db_path(db_path)?;
        Ok(Self::new(repos, ProductivityTable::default()))
    }

    /// 钩子: 劳务人数变更
    ///
    /// 人数不做 > 0 校验 (推算器将非正人数按 1 处理)。
    #[instrument(skip(self), fields(task_id = %task_id, new_labour_count = new_labour_count))]
    pub fn on_labour_change(
        &self,
        task_id: &str,
        new_labour_count: i64,
    ) -> ApiResult<RescheduleResult> {
        let request = RescheduleRequest {
            new_labour_count: Some(new_labour_count),
            ..Default::default()
        };
        let result = self.rescheduler.reschedule(task_id, &request)?;
        info!(new_end = %result.end_date, "劳务变更已处理");
        Ok(result)
    }

    /// 钩子: 材料/资源延误
    ///
    /// # 校验
    /// - delay_days > 0
    /// - reason 非空
    #[instrument(skip(self, reason), fields(task_id = %task_id, delay_days = delay_days))]
    pub fn on_material_delay(
        &self,
        task_id: &str,
        delay_days: i64,
        reason: &str,
    ) -> ApiResult<DelaySummary> {
        if delay_days <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "延误天数必须大于 0: {}",
                delay_days
            )));
        }
        if reason.trim().is_empty() {
            return Err(ApiError::InvalidInput("延误原因不能为空".to_string()));
        }
        let summary = self.applicator.apply(task_id, delay_days, reason)?;
        info!(
            delay_id = %summary.delay_id,
            cascaded = summary.cascaded_count(),
            "延误事件已处理"
        );
        Ok(summary)
    }

    /// 重算里程碑窗口 (可选联动后续里程碑)
    pub fn recalculate_milestone(
        &self,
        milestone_id: &str,
        cascade: bool,
    ) -> ApiResult<MilestoneUpdate> {
        Ok(self.aggregator.recalculate(milestone_id, cascade)?)
    }

    /// 全量重建项目排期
    pub fn rebuild_schedule(&self, project_id: &str) -> ApiResult<RebuildSummary> {
        Ok(self.rebuilder.rebuild(project_id)?)
    }
}
