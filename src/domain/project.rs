// ==========================================
// 工程进度重算引擎 - 项目领域模型
// ==========================================
// 对齐: schema project 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Project - 工程项目
// ==========================================
// 约束: 结束日期只允许全量重排引擎改写
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,            // 项目ID
    pub project_name: String,          // 项目名称
    pub start_date: Option<NaiveDate>, // 项目开始
    pub end_date: Option<NaiveDate>,   // 项目结束 (最后一个里程碑的目标日)
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
