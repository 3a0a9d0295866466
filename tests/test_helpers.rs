// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试数据库初始化与实体工厂
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use construction_scheduler::db;
use construction_scheduler::domain::types;
use construction_scheduler::domain::{Milestone, Project, Task};
use construction_scheduler::engine::ScheduleRepositories;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件 (需要保持存活)
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接 (统一 PRAGMA)
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(db::open_sqlite_connection(db_path)?)
}

/// 建库并返回共享连接上的仓储集合
pub fn setup_repositories() -> (NamedTempFile, ScheduleRepositories) {
    let (temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let conn = open_test_connection(&db_path).expect("打开数据库失败");
    let repos = ScheduleRepositories::from_connection(Arc::new(Mutex::new(conn)));
    (temp_file, repos)
}

/// 日期字面量
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("非法日期")
}

/// 项目工厂
pub fn project_fixture(project_id: &str, start: Option<NaiveDate>) -> Project {
    Project {
        project_id: project_id.to_string(),
        project_name: format!("测试项目_{}", project_id),
        start_date: start,
        end_date: None,
        created_at: types::now(),
        updated_at: types::now(),
    }
}

/// 里程碑工厂
pub fn milestone_fixture(milestone_id: &str, project_id: &str, sort_order: i64) -> Milestone {
    Milestone {
        milestone_id: milestone_id.to_string(),
        project_id: project_id.to_string(),
        milestone_name: format!("里程碑_{}", milestone_id),
        sort_order,
        start_date: None,
        target_date: None,
        revision: 0,
        created_at: types::now(),
        updated_at: types::now(),
    }
}

/// 任务工厂 (无工程量、无日期的 general 任务,测试按需改字段)
pub fn task_fixture(task_id: &str) -> Task {
    Task {
        task_id: task_id.to_string(),
        milestone_id: None,
        project_id: None,
        title: format!("任务_{}", task_id),
        labour_ids: Vec::new(),
        labour_count: None,
        work_qty: None,
        work_type: "general".to_string(),
        start_date: None,
        end_date: None,
        due_date: None,
        duration_days: None,
        sort_order: 0,
        due_alert_sent: false,
        created_at: types::now(),
        updated_at: types::now(),
    }
}

/// N 个劳务ID
pub fn labour_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("labour-{:02}", i)).collect()
}
