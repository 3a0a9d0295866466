// ==========================================
// 工程进度重算引擎 - 任务领域模型
// ==========================================
// 任务是排期的最小单元: 工期由劳务人数 × 工程量推算
// 对齐: schema task 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Task - 施工任务
// ==========================================
// 红线: 日期/工期字段只允许重算引擎改写
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    // ===== 主键与归属 =====
    pub task_id: String,               // 任务ID
    pub milestone_id: Option<String>,  // 所属里程碑 (可空)
    pub project_id: Option<String>,    // 所属项目 (冗余引用,便于日志快照)

    // ===== 基本信息 =====
    pub title: String,                 // 任务名称
    pub labour_ids: Vec<String>,       // 分配劳务ID列表 (有序,数量即劳务人数)
    pub labour_count: Option<i64>,     // 显式劳务人数 (引擎改写人数时落在此列)
    pub work_qty: Option<f64>,         // 工程量 (单位由工种决定)
    pub work_type: String,             // 工种 (默认 general)

    // ===== 排期字段 (引擎专属写入) =====
    pub start_date: Option<NaiveDate>, // 计划开始
    pub end_date: Option<NaiveDate>,   // 计划结束
    pub due_date: Option<NaiveDate>,   // 到期日 (镜像计划结束)
    pub duration_days: Option<i64>,    // 预估工期 (天)
    pub sort_order: i64,               // 里程碑内的声明顺序 (全量重排使用)

    // ===== 外部协作字段 =====
    pub due_alert_sent: bool,          // 到期提醒已发送 (通知模块消费,本引擎不改写)

    // ===== 审计 =====
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    /// 已分配的劳务人数
    ///
    /// 优先取显式人数列 (劳务名单同步可能滞后于人数调整),
    /// 其次取分配名单长度。
    pub fn effective_labour_count(&self) -> Option<i64> {
        match self.labour_count {
            Some(n) if n > 0 => Some(n),
            _ if !self.labour_ids.is_empty() => Some(self.labour_ids.len() as i64),
            _ => None,
        }
    }
}
