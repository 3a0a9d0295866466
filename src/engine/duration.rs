// ==========================================
// 工程进度重算引擎 - 工期推算
// ==========================================
// 职责: 劳务人数 × 工程量 × 工效 → 整天工期
// 约束: 纯函数,不读写存储;输出恒 ≥ 1 天
// ==========================================

use crate::config::{ProductivityTable, DEFAULT_TASK_DURATION_DAYS};
use crate::domain::task::Task;

// ==========================================
// DurationOverrides - 推算覆写项
// ==========================================
/// 推算覆写项
/// 用途: 变更事件携带的新值 (如劳务人数调整) 优先于任务存量字段
#[derive(Debug, Clone, Default)]
pub struct DurationOverrides {
    pub labour_count: Option<i64>,
    pub work_qty: Option<f64>,
    pub work_type: Option<String>,
}

// ==========================================
// DurationCalculator - 工期推算器
// ==========================================
pub struct DurationCalculator {
    table: ProductivityTable,
}

impl DurationCalculator {
    pub fn new(table: ProductivityTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ProductivityTable {
        &self.table
    }

    /// 推算任务工期 (整天, 最小 1)
    ///
    /// # 取值顺序
    /// - 劳务人数: 覆写 → 任务存量人数 → 1
    /// - 工程量:   覆写 → 任务存量 → 0
    /// - 工种:     覆写 → 任务存量 → general
    ///
    /// # 回退规则
    /// - 工程量 ≤ 0 且任务已有起止日期: 取既有跨度 (最小 1 天)
    /// - 工程量 ≤ 0 且无起止日期: 默认 5 天
    /// - 否则: ceil(工程量 / (人数 × 工效)), 下限 1 天
    ///
    /// 人数 ≤ 0 视作 1,不报错 (调用方不做校验)。
    pub fn calc(&self, task: &Task, overrides: &DurationOverrides) -> i64 {
        let labour = overrides
            .labour_count
            .or_else(|| task.effective_labour_count())
            .unwrap_or(1)
            .max(1);

        let quantity = overrides.work_qty.or(task.work_qty).unwrap_or(0.0);

        let work_type = overrides
            .work_type
            .as_deref()
            .unwrap_or(task.work_type.as_str());
        let rate = self.table.rate_for(work_type);

        if quantity <= 0.0 {
            return self.fallback_duration(task);
        }

        let daily_output = labour as f64 * rate.rate_per_labour_day;
        if daily_output <= 0.0 || !daily_output.is_finite() {
            // 工效配置为 0 或非法时无法推算,走回退路径
            return self.fallback_duration(task);
        }

        ((quantity / daily_output).ceil() as i64).max(1)
    }

    /// 无法按工程量推算时的工期回退
    fn fallback_duration(&self, task: &Task) -> i64 {
        match (task.start_date, task.end_date) {
            (Some(start), Some(end)) => (end - start).num_days().max(1),
            _ => DEFAULT_TASK_DURATION_DAYS,
        }
    }
}
