// ==========================================
// 工程进度重算引擎 - 延误日志领域模型
// ==========================================
// 红线: 延误日志只追加,本引擎不更新不删除
// 用途: 审计追踪,延误原因分析
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::task::Task;
use crate::domain::types;

// ==========================================
// DelayLogEntry - 延误日志条目
// ==========================================
// 项目/里程碑引用是写入时刻的快照 (冗余存储),
// 任务后续改挂里程碑不影响历史日志。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayLogEntry {
    pub delay_id: String,             // 日志ID (uuid v4)
    pub task_id: String,              // 任务ID
    pub task_title: String,           // 任务名称快照
    pub project_id: Option<String>,   // 项目引用快照
    pub milestone_id: Option<String>, // 里程碑引用快照
    pub delay_days: i64,              // 延误天数
    pub reason: String,               // 延误原因 (自由文本)
    pub applied_at: NaiveDateTime,    // 写入时间
}

impl DelayLogEntry {
    /// 从任务当前状态生成快照条目
    pub fn snapshot(task: &Task, delay_days: i64, reason: &str) -> Self {
        Self {
            delay_id: Uuid::new_v4().to_string(),
            task_id: task.task_id.clone(),
            task_title: task.title.clone(),
            project_id: task.project_id.clone(),
            milestone_id: task.milestone_id.clone(),
            delay_days,
            reason: reason.to_string(),
            applied_at: types::now(),
        }
    }
}
