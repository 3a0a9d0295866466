// ==========================================
// 工程进度重算引擎 - 全量顺排重建
// ==========================================
// 职责: 忽略全部既有日期,按声明顺序从头顺排整个项目
// 输入: 项目ID
// 输出: 重建摘要 (里程碑窗口 + 任务更新数 + 新项目结束日)
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::{ProductivityTable, SEQUENCE_BUFFER_DAYS};
use crate::domain::types;
use crate::engine::duration::{DurationCalculator, DurationOverrides};
use crate::repository::{MilestoneRepository, ProjectRepository, RepositoryResult, TaskRepository};

// ==========================================
// MilestoneWindow - 重建后的里程碑窗口
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneWindow {
    pub milestone_id: String,
    pub milestone_name: String,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub task_count: usize,
}

// ==========================================
// RebuildSummary - 全量重建摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildSummary {
    pub project_id: String,
    pub milestones: Vec<MilestoneWindow>,
    pub tasks_updated: usize,
    /// 新项目结束日 (项目无里程碑时为 None,项目记录不动)
    pub project_end: Option<NaiveDate>,
}

// ==========================================
// ScheduleRebuilder - 全量顺排引擎
// ==========================================
pub struct ScheduleRebuilder {
    project_repo: Arc<ProjectRepository>,
    milestone_repo: Arc<MilestoneRepository>,
    task_repo: Arc<TaskRepository>,
    calculator: DurationCalculator,
}

impl ScheduleRebuilder {
    pub fn new(
        project_repo: Arc<ProjectRepository>,
        milestone_repo: Arc<MilestoneRepository>,
        task_repo: Arc<TaskRepository>,
        table: ProductivityTable,
    ) -> Self {
        Self {
            project_repo,
            milestone_repo,
            task_repo,
            calculator: DurationCalculator::new(table),
        }
    }

    /// 从头顺排整个项目
    ///
    /// # 算法
    /// 1. 基准开始 = 项目开始日 → 今天
    /// 2. 里程碑按 sort_order 升序 (同序按 milestone_id),
    ///    里程碑内任务按任务自身声明顺序
    /// 3. 任务逐个首尾相接,任务间 1 天缓冲;工期由工期推算器给出
    /// 4. 里程碑窗口 = [进入时的游标, 最晚任务结束];
    ///    空里程碑得到点窗口,游标只推进 1 天缓冲
    /// 5. 项目结束日 = 最后一个里程碑的目标日 (无里程碑则不更新项目)
    ///
    /// 对未变化的项目重复执行结果一致 (幂等)。
    ///
    /// # 失败
    /// - NotFound: 项目不存在
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub fn rebuild(&self, project_id: &str) -> RepositoryResult<RebuildSummary> {
        let project = self.project_repo.find_by_id(project_id)?;
        let base_start = project.start_date.unwrap_or_else(types::today);

        let milestones = self.milestone_repo.find_by_project(project_id)?;
        let mut current_start = base_start;
        let mut windows = Vec::with_capacity(milestones.len());
        let mut tasks_updated = 0usize;

        for milestone in milestones {
            let tasks = self
                .task_repo
                .find_by_milestone_declared_order(&milestone.milestone_id)?;

            let mut task_start = current_start;
            let mut latest_task_end = current_start;
            for task in &tasks {
                let duration = self.calculator.calc(task, &DurationOverrides::default());
                let task_end = task_start + Duration::days(duration);
                self.task_repo
                    .update_schedule(&task.task_id, task_start, task_end, duration, None)?;
                tasks_updated += 1;
                latest_task_end = latest_task_end.max(task_end);
                task_start = task_end + Duration::days(SEQUENCE_BUFFER_DAYS);
            }

            self.milestone_repo.update_window(
                &milestone.milestone_id,
                current_start,
                latest_task_end,
            )?;
            debug!(
                milestone_id = %milestone.milestone_id,
                start = %current_start,
                target = %latest_task_end,
                task_count = tasks.len(),
                "里程碑顺排完成"
            );

            windows.push(MilestoneWindow {
                milestone_id: milestone.milestone_id,
                milestone_name: milestone.milestone_name,
                start_date: current_start,
                target_date: latest_task_end,
                task_count: tasks.len(),
            });
            current_start = latest_task_end + Duration::days(SEQUENCE_BUFFER_DAYS);
        }

        let project_end = windows.last().map(|w| w.target_date);
        if let Some(end) = project_end {
            self.project_repo.update_end_date(project_id, end)?;
        }

        info!(
            milestones = windows.len(),
            tasks_updated,
            project_end = ?project_end,
            "全量顺排完成"
        );

        Ok(RebuildSummary {
            project_id: project.project_id,
            milestones: windows,
            tasks_updated,
            project_end,
        })
    }
}
