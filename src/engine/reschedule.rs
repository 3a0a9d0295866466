// ==========================================
// 工程进度重算引擎 - 单任务重排
// ==========================================
// 职责: 按新劳务人数/延误/指定开始日重算单个任务的起止
// 输入: 任务ID + 可选覆写项
// 输出: 任务重排投影 (起止/工期/人数/已施延误)
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::ProductivityTable;
use crate::domain::types;
use crate::engine::duration::{DurationCalculator, DurationOverrides};
use crate::repository::{RepositoryResult, TaskRepository};

// ==========================================
// RescheduleRequest - 重排请求
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RescheduleRequest {
    pub new_labour_count: Option<i64>,     // 新劳务人数 (不校验 > 0)
    pub delay_days: Option<i64>,           // 延误天数 (≤ 0 视为无延误)
    pub start_override: Option<NaiveDate>, // 指定开始日
}

// ==========================================
// RescheduleResult - 重排结果投影
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleResult {
    pub task_id: String,
    pub title: String,
    pub duration_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub labour_count: i64,
    pub delay_applied: i64,
}

// ==========================================
// TaskRescheduler - 单任务重排引擎
// ==========================================
pub struct TaskRescheduler {
    task_repo: Arc<TaskRepository>,
    calculator: DurationCalculator,
}

impl TaskRescheduler {
    pub fn new(task_repo: Arc<TaskRepository>, table: ProductivityTable) -> Self {
        Self {
            task_repo,
            calculator: DurationCalculator::new(table),
        }
    }

    /// 重算单个任务的起止日期并落库
    ///
    /// # 算法
    /// 1. 工期 = 工期推算器(任务, 新人数)
    /// 2. 基准开始 = 指定开始日 → 存量开始日 → 今天
    /// 3. 延误 > 0 时基准开始顺延
    /// 4. 结束 = 开始 + 工期;到期日镜像结束日
    ///
    /// # 失败
    /// - NotFound: 任务不存在
    #[instrument(skip(self, request), fields(task_id = %task_id))]
    pub fn reschedule(
        &self,
        task_id: &str,
        request: &RescheduleRequest,
    ) -> RepositoryResult<RescheduleResult> {
        let task = self.task_repo.find_by_id(task_id)?;

        let overrides = DurationOverrides {
            labour_count: request.new_labour_count,
            ..Default::default()
        };
        let duration = self.calculator.calc(&task, &overrides);

        let mut start = request
            .start_override
            .or(task.start_date)
            .unwrap_or_else(types::today);
        let delay = request.delay_days.unwrap_or(0).max(0);
        if delay > 0 {
            start = start + Duration::days(delay);
        }
        let end = start + Duration::days(duration);

        // 人数未变化时不触碰人数列
        let labour_to_persist = request
            .new_labour_count
            .filter(|n| task.labour_count != Some(*n));
        self.task_repo
            .update_schedule(task_id, start, end, duration, labour_to_persist)?;

        let labour_count = request
            .new_labour_count
            .or_else(|| task.effective_labour_count())
            .unwrap_or(1)
            .max(1);

        info!(
            duration_days = duration,
            start = %start,
            end = %end,
            delay_applied = delay,
            "任务重排完成"
        );

        Ok(RescheduleResult {
            task_id: task.task_id,
            title: task.title,
            duration_days: duration,
            start_date: start,
            end_date: end,
            labour_count,
            delay_applied: delay,
        })
    }
}
