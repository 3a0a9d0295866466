// ==========================================
// 工程进度重算引擎 - 里程碑联动传播
// ==========================================
// 职责: 某里程碑结束日变化后,顺序重排其后全部兄弟里程碑,
//       并整体平移各自的任务块
// 顺序保证: 严格按 sort_order 升序单线处理,同序按 milestone_id 升序,
//           后一个只依赖前一个刚算出的结束日
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::{DEFAULT_MILESTONE_DURATION_DAYS, DEFAULT_TASK_DURATION_DAYS, SEQUENCE_BUFFER_DAYS};
use crate::domain::task::Task;
use crate::domain::types;
use crate::repository::{MilestoneRepository, RepositoryResult, TaskRepository};

// ==========================================
// CascadeStep - 单个里程碑的联动结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeStep {
    pub milestone_id: String,
    pub milestone_name: String,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub shifted_tasks: usize,
}

// ==========================================
// CascadePropagator - 联动传播引擎
// ==========================================
pub struct CascadePropagator {
    milestone_repo: Arc<MilestoneRepository>,
    task_repo: Arc<TaskRepository>,
}

impl CascadePropagator {
    pub fn new(milestone_repo: Arc<MilestoneRepository>, task_repo: Arc<TaskRepository>) -> Self {
        Self {
            milestone_repo,
            task_repo,
        }
    }

    /// 从触发里程碑的新结束日向后传播
    ///
    /// # 算法 (逐个,顺序)
    /// 1. 里程碑工期 = max(任务结束 − 任务开始);无可推算任务时默认 30 天
    /// 2. 新开始 = 运行结束日 + 1 天缓冲
    /// 3. 新结束 = 新开始 + 工期;窗口以乐观锁写入
    /// 4. 任务块整体平移对齐新开始
    /// 5. 运行结束日推进到新结束
    ///
    /// 中途写入失败时,已处理的里程碑保持更新,之后的不再处理
    /// (无回滚;错误向上传播)。
    #[instrument(skip(self), fields(project_id = %project_id, from = %from_milestone_id, new_end = %new_end))]
    pub fn propagate(
        &self,
        project_id: &str,
        from_milestone_id: &str,
        new_end: NaiveDate,
    ) -> RepositoryResult<Vec<CascadeStep>> {
        let trigger = self.milestone_repo.find_by_id(from_milestone_id)?;
        let following =
            self.milestone_repo
                .find_following(project_id, trigger.sort_order, from_milestone_id)?;

        let mut current_end = new_end;
        let mut steps = Vec::with_capacity(following.len());

        for milestone in following {
            let tasks = self.task_repo.find_by_milestone(&milestone.milestone_id)?;
            let duration = tasks
                .iter()
                .filter_map(|t| match (t.start_date, t.end_date) {
                    (Some(start), Some(end)) => Some((end - start).num_days()),
                    _ => None,
                })
                .max()
                .unwrap_or(DEFAULT_MILESTONE_DURATION_DAYS);

            let new_start = current_end + Duration::days(SEQUENCE_BUFFER_DAYS);
            let new_target = new_start + Duration::days(duration);

            self.milestone_repo.update_window_checked(
                &milestone.milestone_id,
                milestone.revision,
                new_start,
                new_target,
            )?;
            let shifted = self.shift_task_block(&tasks, new_start)?;

            debug!(
                milestone_id = %milestone.milestone_id,
                start = %new_start,
                target = %new_target,
                shifted_tasks = shifted,
                "里程碑联动重排"
            );

            current_end = new_target;
            steps.push(CascadeStep {
                milestone_id: milestone.milestone_id,
                milestone_name: milestone.milestone_name,
                start_date: new_start,
                target_date: new_target,
                shifted_tasks: shifted,
            });
        }

        info!(cascaded = steps.len(), "联动传播完成");
        Ok(steps)
    }

    /// 整体平移某里程碑的任务块,对齐新的里程碑开始日
    ///
    /// 不变量: 任务间相对顺序与相对间距不变,仅整块平移。
    pub fn shift_tasks(
        &self,
        milestone_id: &str,
        new_milestone_start: NaiveDate,
    ) -> RepositoryResult<usize> {
        let tasks = self.task_repo.find_by_milestone(milestone_id)?;
        self.shift_task_block(&tasks, new_milestone_start)
    }

    /// 平移已加载的任务块
    ///
    /// 平移量 = 新里程碑开始 − 原里程碑开始 (最早任务开始日,
    /// 全部无日期时取今天);可为负,即允许整体提前。
    fn shift_task_block(
        &self,
        tasks: &[Task],
        new_milestone_start: NaiveDate,
    ) -> RepositoryResult<usize> {
        let original_start = tasks
            .iter()
            .filter_map(|t| t.start_date)
            .min()
            .unwrap_or_else(types::today);
        let shift = (new_milestone_start - original_start).num_days();

        for task in tasks {
            let base_start = task.start_date.unwrap_or(new_milestone_start);
            let base_end = task
                .end_date
                .unwrap_or(base_start + Duration::days(DEFAULT_TASK_DURATION_DAYS));
            self.task_repo.update_dates(
                &task.task_id,
                base_start + Duration::days(shift),
                base_end + Duration::days(shift),
            )?;
        }
        Ok(tasks.len())
    }
}
