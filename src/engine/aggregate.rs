// ==========================================
// 工程进度重算引擎 - 里程碑窗口聚合
// ==========================================
// 职责: 由成员任务的起止日期推导里程碑窗口
// 输入: 里程碑ID + 是否联动
// 输出: 里程碑更新投影 (可附带联动结果)
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::DEFAULT_MILESTONE_DURATION_DAYS;
use crate::domain::types;
use crate::engine::cascade::{CascadePropagator, CascadeStep};
use crate::repository::{MilestoneRepository, RepositoryResult, TaskRepository};

// ==========================================
// MilestoneUpdate - 聚合结果投影
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneUpdate {
    pub milestone_id: String,
    pub milestone_name: String,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub task_count: usize,
    /// 是否实际写入窗口 (空里程碑不写)
    pub updated: bool,
    /// 联动重排的后续里程碑 (cascade=false 或空里程碑时为空)
    pub cascaded: Vec<CascadeStep>,
}

// ==========================================
// MilestoneAggregator - 里程碑聚合引擎
// ==========================================
pub struct MilestoneAggregator {
    milestone_repo: Arc<MilestoneRepository>,
    task_repo: Arc<TaskRepository>,
    propagator: CascadePropagator,
}

impl MilestoneAggregator {
    pub fn new(milestone_repo: Arc<MilestoneRepository>, task_repo: Arc<TaskRepository>) -> Self {
        let propagator = CascadePropagator::new(milestone_repo.clone(), task_repo.clone());
        Self {
            milestone_repo,
            task_repo,
            propagator,
        }
    }

    /// 重算里程碑窗口
    ///
    /// # 算法
    /// 1. 无任务: 不改窗口,不联动,updated=false
    /// 2. 开始 = 最早任务开始 (全部无开始时取今天)
    /// 3. 结束 = 最晚任务结束 (结束缺失时退用到期日);
    ///    全部不可得时默认 开始 + 30 天
    /// 4. 窗口落库;cascade=true 时以新结束日触发联动传播
    ///
    /// # 失败
    /// - NotFound: 里程碑不存在
    #[instrument(skip(self), fields(milestone_id = %milestone_id, cascade = cascade))]
    pub fn recalculate(
        &self,
        milestone_id: &str,
        cascade: bool,
    ) -> RepositoryResult<MilestoneUpdate> {
        let milestone = self.milestone_repo.find_by_id(milestone_id)?;
        let tasks = self.task_repo.find_by_milestone(milestone_id)?;

        if tasks.is_empty() {
            // 空里程碑: 无日期可聚合,窗口保持原样,亦不向后联动
            debug!("里程碑无任务,窗口不变");
            return Ok(MilestoneUpdate {
                milestone_id: milestone.milestone_id,
                milestone_name: milestone.milestone_name,
                start_date: milestone.start_date,
                target_date: milestone.target_date,
                task_count: 0,
                updated: false,
                cascaded: Vec::new(),
            });
        }

        let start = tasks
            .iter()
            .filter_map(|t| t.start_date)
            .min()
            .unwrap_or_else(types::today);
        let target = tasks
            .iter()
            .filter_map(|t| t.end_date.or(t.due_date))
            .max()
            .unwrap_or(start + Duration::days(DEFAULT_MILESTONE_DURATION_DAYS));

        self.milestone_repo
            .update_window(milestone_id, start, target)?;

        let cascaded = if cascade {
            self.propagator
                .propagate(&milestone.project_id, milestone_id, target)?
        } else {
            Vec::new()
        };

        info!(
            start = %start,
            target = %target,
            task_count = tasks.len(),
            cascaded = cascaded.len(),
            "里程碑窗口已聚合"
        );

        Ok(MilestoneUpdate {
            milestone_id: milestone.milestone_id,
            milestone_name: milestone.milestone_name,
            start_date: Some(start),
            target_date: Some(target),
            task_count: tasks.len(),
            updated: true,
            cascaded,
        })
    }
}
