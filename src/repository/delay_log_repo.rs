// ==========================================
// 工程进度重算引擎 - 延误日志数据仓储
// ==========================================
// 红线: 只追加;本仓储不提供更新/删除接口
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::delay_log::DelayLogEntry;
use crate::domain::types::{format_datetime, now, parse_datetime_flexible};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// DelayLogRepository - 延误日志仓储
// ==========================================
/// 延误日志仓储
/// 职责: delay_log 表的追加与查询
pub struct DelayLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DelayLogRepository {
    /// 创建新的 DelayLogRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 行映射: delay_log 表 → DelayLogEntry
    fn row_to_entry(row: &Row) -> rusqlite::Result<DelayLogEntry> {
        let applied_raw: String = row.get("applied_at")?;
        Ok(DelayLogEntry {
            delay_id: row.get("delay_id")?,
            task_id: row.get("task_id")?,
            task_title: row.get("task_title")?,
            project_id: row.get("project_id")?,
            milestone_id: row.get("milestone_id")?,
            delay_days: row.get("delay_days")?,
            reason: row.get("reason")?,
            applied_at: parse_datetime_flexible(&applied_raw).unwrap_or_else(now),
        })
    }

    /// 追加延误日志
    pub fn insert(&self, entry: &DelayLogEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO delay_log (
                delay_id, task_id, task_title, project_id, milestone_id,
                delay_days, reason, applied_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                entry.delay_id,
                entry.task_id,
                entry.task_title,
                entry.project_id,
                entry.milestone_id,
                entry.delay_days,
                entry.reason,
                format_datetime(entry.applied_at),
            ],
        )?;
        Ok(())
    }

    /// 查询任务的延误历史 (写入时间升序)
    pub fn find_by_task(&self, task_id: &str) -> RepositoryResult<Vec<DelayLogEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT delay_id, task_id, task_title, project_id, milestone_id,
                      delay_days, reason, applied_at
               FROM delay_log WHERE task_id = ?1
               ORDER BY applied_at ASC, delay_id ASC"#,
        )?;
        let rows = stmt.query_map(params![task_id], Self::row_to_entry)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// 查询项目的延误历史 (写入时间升序)
    pub fn find_by_project(&self, project_id: &str) -> RepositoryResult<Vec<DelayLogEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT delay_id, task_id, task_title, project_id, milestone_id,
                      delay_days, reason, applied_at
               FROM delay_log WHERE project_id = ?1
               ORDER BY applied_at ASC, delay_id ASC"#,
        )?;
        let rows = stmt.query_map(params![project_id], Self::row_to_entry)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
