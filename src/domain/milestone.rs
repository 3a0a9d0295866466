// ==========================================
// 工程进度重算引擎 - 里程碑领域模型
// ==========================================
// 里程碑是项目内任务的有序分组,窗口由任务日期聚合而来
// 对齐: schema milestone 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Milestone - 里程碑
// ==========================================
// sort_order 决定联动方向: 只向序号更大的里程碑传播
// 同序并列时以 milestone_id 升序为准 (见 DESIGN.md)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub milestone_id: String,           // 里程碑ID
    pub project_id: String,             // 所属项目
    pub milestone_name: String,         // 显示名称
    pub sort_order: i64,                // 项目内顺序 (允许留空档)
    pub start_date: Option<NaiveDate>,  // 窗口开始
    pub target_date: Option<NaiveDate>, // 窗口目标 (结束)
    pub revision: i64,                  // 乐观锁修订号
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Milestone {
    /// 窗口跨度 (天); 起止齐全时才可计算
    pub fn window_days(&self) -> Option<i64> {
        match (self.start_date, self.target_date) {
            (Some(start), Some(target)) => Some((target - start).num_days()),
            _ => None,
        }
    }
}
