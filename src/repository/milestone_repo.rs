// ==========================================
// 工程进度重算引擎 - 里程碑数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发: 窗口写入提供乐观锁 (revision 比较交换)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::milestone::Milestone;
use crate::domain::types::{format_date, format_datetime, now, parse_date_flexible, parse_datetime_flexible};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const MILESTONE_COLUMNS: &str = r#"
    milestone_id, project_id, milestone_name, sort_order,
    start_date, target_date, revision, created_at, updated_at
"#;

// ==========================================
// MilestoneRepository - 里程碑仓储
// ==========================================
/// 里程碑仓储
/// 职责: 管理 milestone 表的数据访问
pub struct MilestoneRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MilestoneRepository {
    /// 创建新的 MilestoneRepository 实例
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

    /// 行映射: milestone 表 → Milestone 实体
    fn row_to_milestone(row: &Row) -> rusqlite::Result<Milestone> {
        let start_raw: Option<String> = row.get("start_date")?;
        let target_raw: Option<String> = row.get("target_date")?;
        let created_raw: String = row.get("created_at")?;
        let updated_raw: String = row.get("updated_at")?;

        Ok(Milestone {
            milestone_id: row.get("milestone_id")?,
            project_id: row.get("project_id")?,
            milestone_name: row.get("milestone_name")?,
            sort_order: row.get("sort_order")?,
            start_date: start_raw.as_deref().and_then(parse_date_flexible),
            target_date: target_raw.as_deref().and_then(parse_date_flexible),
            revision: row.get("revision")?,
            created_at: parse_datetime_flexible(&created_raw).unwrap_or_else(now),
            updated_at: parse_datetime_flexible(&updated_raw).unwrap_or_else(now),
        })
    }

    /// 按ID查询里程碑
    pub fn find_by_id(&self, milestone_id: &str) -> RepositoryResult<Milestone> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM milestone WHERE milestone_id = ?1",
            MILESTONE_COLUMNS
        );
        let milestone = conn
            .query_row(&sql, params![milestone_id], Self::row_to_milestone)
            .optional()?;
        milestone.ok_or_else(|| RepositoryError::not_found("Milestone", milestone_id))
    }

    /// 查询项目下全部里程碑 (sort_order 升序,同序按 milestone_id 升序)
    pub fn find_by_project(&self, project_id: &str) -> RepositoryResult<Vec<Milestone>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM milestone WHERE project_id = ?1
             ORDER BY sort_order ASC, milestone_id ASC",
            MILESTONE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![project_id], Self::row_to_milestone)?;
        let mut milestones = Vec::new();
        for row in rows {
            milestones.push(row?);
        }
        Ok(milestones)
    }

    /// 查询排在给定里程碑之后的兄弟里程碑
    ///
    /// 顺序语义: sort_order 严格更大者在后;同序并列时
    /// 以 milestone_id 升序裁决 (联动方向的平局规则)。
    pub fn find_following(
        &self,
        project_id: &str,
        sort_order: i64,
        milestone_id: &str,
    ) -> RepositoryResult<Vec<Milestone>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM milestone
             WHERE project_id = ?1
               AND (sort_order > ?2 OR (sort_order = ?2 AND milestone_id > ?3))
             ORDER BY sort_order ASC, milestone_id ASC",
            MILESTONE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![project_id, sort_order, milestone_id],
            Self::row_to_milestone,
        )?;
        let mut milestones = Vec::new();
        for row in rows {
            milestones.push(row?);
        }
        Ok(milestones)
    }

    /// 插入里程碑 (项目初始化流程使用)
    pub fn insert(&self, milestone: &Milestone) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO milestone (
                milestone_id, project_id, milestone_name, sort_order,
                start_date, target_date, revision, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                milestone.milestone_id,
                milestone.project_id,
                milestone.milestone_name,
                milestone.sort_order,
                milestone.start_date.map(format_date),
                milestone.target_date.map(format_date),
                milestone.revision,
                format_datetime(milestone.created_at),
                format_datetime(milestone.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 写入里程碑窗口 (无版本检查)
    ///
    /// 聚合/全量重排使用;revision 照常自增,
    /// 以便并发的带检查写入能够察觉。
    pub fn update_window(
        &self,
        milestone_id: &str,
        start: NaiveDate,
        target: NaiveDate,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"UPDATE milestone
               SET start_date = ?1, target_date = ?2,
                   revision = revision + 1, updated_at = ?3
               WHERE milestone_id = ?4"#,
            params![
                format_date(start),
                format_date(target),
                format_datetime(now()),
                milestone_id,
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Milestone", milestone_id));
        }
        Ok(())
    }

    /// 写入里程碑窗口 (乐观锁,比较交换 revision)
    ///
    /// # 返回
    /// - Err(OptimisticLockFailure): revision 不匹配 (并发联动已改写)
    /// - Err(NotFound): milestone_id 不存在
    pub fn update_window_checked(
        &self,
        milestone_id: &str,
        expected_revision: i64,
        start: NaiveDate,
        target: NaiveDate,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"UPDATE milestone
               SET start_date = ?1, target_date = ?2,
                   revision = revision + 1, updated_at = ?3
               WHERE milestone_id = ?4 AND revision = ?5"#,
            params![
                format_date(start),
                format_date(target),
                format_datetime(now()),
                milestone_id,
                expected_revision,
            ],
        )?;

        if rows == 0 {
            // 区分记录不存在与 revision 冲突
            let actual: Option<i64> = conn
                .query_row(
                    "SELECT revision FROM milestone WHERE milestone_id = ?1",
                    params![milestone_id],
                    |row| row.get(0),
                )
                .optional()?;
            return match actual {
                Some(actual_revision) => Err(RepositoryError::OptimisticLockFailure {
                    milestone_id: milestone_id.to_string(),
                    expected: expected_revision,
                    actual: actual_revision,
                }),
                None => Err(RepositoryError::not_found("Milestone", milestone_id)),
            };
        }
        Ok(())
    }
}
