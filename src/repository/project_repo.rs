// ==========================================
// 工程进度重算引擎 - 项目数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::project::Project;
use crate::domain::types::{format_date, format_datetime, now, parse_date_flexible, parse_datetime_flexible};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProjectRepository - 项目仓储
// ==========================================
/// 项目仓储
/// 职责: 管理 project 表的数据访问
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectRepository {
    /// 创建新的 ProjectRepository 实例
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

    /// 行映射: project 表 → Project 实体
    fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
        let start_raw: Option<String> = row.get("start_date")?;
        let end_raw: Option<String> = row.get("end_date")?;
        let created_raw: String = row.get("created_at")?;
        let updated_raw: String = row.get("updated_at")?;

        Ok(Project {
            project_id: row.get("project_id")?,
            project_name: row.get("project_name")?,
            start_date: start_raw.as_deref().and_then(parse_date_flexible),
            end_date: end_raw.as_deref().and_then(parse_date_flexible),
            created_at: parse_datetime_flexible(&created_raw).unwrap_or_else(now),
            updated_at: parse_datetime_flexible(&updated_raw).unwrap_or_else(now),
        })
    }

    /// 按ID查询项目
    pub fn find_by_id(&self, project_id: &str) -> RepositoryResult<Project> {
        let conn = self.get_conn()?;
        let project = conn
            .query_row(
                r#"SELECT project_id, project_name, start_date, end_date,
                          created_at, updated_at
                   FROM project WHERE project_id = ?1"#,
                params![project_id],
                Self::row_to_project,
            )
            .optional()?;
        project.ok_or_else(|| RepositoryError::not_found("Project", project_id))
    }

    /// 插入项目 (项目初始化流程使用)
    pub fn insert(&self, project: &Project) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO project (
                project_id, project_name, start_date, end_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                project.project_id,
                project.project_name,
                project.start_date.map(format_date),
                project.end_date.map(format_date),
                format_datetime(project.created_at),
                format_datetime(project.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 写入项目结束日期 (仅全量重排引擎调用)
    pub fn update_end_date(&self, project_id: &str, end: NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE project SET end_date = ?1, updated_at = ?2 WHERE project_id = ?3",
            params![format_date(end), format_datetime(now()), project_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Project", project_id));
        }
        Ok(())
    }
}
