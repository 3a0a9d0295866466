// ==========================================
// 工程进度重算引擎 - 任务数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::task::Task;
use crate::domain::types::{format_date, format_datetime, now, parse_date_flexible, parse_datetime_flexible};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const TASK_COLUMNS: &str = r#"
    task_id, milestone_id, project_id, title,
    labour_ids, labour_count, work_qty, work_type,
    start_date, end_date, due_date, duration_days,
    sort_order, due_alert_sent, created_at, updated_at
"#;

// ==========================================
// TaskRepository - 任务仓储
// ==========================================
/// 任务仓储
/// 职责: 管理 task 表的数据访问
/// 红线: 不含业务逻辑,日期在此处统一规整
pub struct TaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaskRepository {
    /// 创建新的 TaskRepository 实例
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

    /// 行映射: task 表 → Task 实体
    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let labour_raw: String = row.get("labour_ids")?;
        let start_raw: Option<String> = row.get("start_date")?;
        let end_raw: Option<String> = row.get("end_date")?;
        let due_raw: Option<String> = row.get("due_date")?;
        let created_raw: String = row.get("created_at")?;
        let updated_raw: String = row.get("updated_at")?;

        Ok(Task {
            task_id: row.get("task_id")?,
            milestone_id: row.get("milestone_id")?,
            project_id: row.get("project_id")?,
            title: row.get("title")?,
            labour_ids: serde_json::from_str(&labour_raw).unwrap_or_default(),
            labour_count: row.get("labour_count")?,
            work_qty: row.get("work_qty")?,
            work_type: row.get("work_type")?,
            start_date: start_raw.as_deref().and_then(parse_date_flexible),
            end_date: end_raw.as_deref().and_then(parse_date_flexible),
            due_date: due_raw.as_deref().and_then(parse_date_flexible),
            duration_days: row.get("duration_days")?,
            sort_order: row.get("sort_order")?,
            due_alert_sent: row.get::<_, i64>("due_alert_sent")? != 0,
            created_at: parse_datetime_flexible(&created_raw).unwrap_or_else(now),
            updated_at: parse_datetime_flexible(&updated_raw).unwrap_or_else(now),
        })
    }

    /// 按ID查询任务
    ///
    /// # 返回
    /// - Ok(Task): 找到任务
    /// - Err(NotFound): 任务不存在
    pub fn find_by_id(&self, task_id: &str) -> RepositoryResult<Task> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM task WHERE task_id = ?1", TASK_COLUMNS);
        let task = conn
            .query_row(&sql, params![task_id], Self::row_to_task)
            .optional()?;
        task.ok_or_else(|| RepositoryError::not_found("Task", task_id))
    }

    /// 查询里程碑下的全部任务 (计划开始升序,无日期的排在末尾)
    pub fn find_by_milestone(&self, milestone_id: &str) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM task WHERE milestone_id = ?1
             ORDER BY start_date IS NULL, start_date ASC, task_id ASC",
            TASK_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![milestone_id], Self::row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// 查询里程碑下的全部任务 (声明顺序,全量重排使用)
    pub fn find_by_milestone_declared_order(
        &self,
        milestone_id: &str,
    ) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM task WHERE milestone_id = ?1
             ORDER BY sort_order ASC, task_id ASC",
            TASK_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![milestone_id], Self::row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// 插入任务 (项目初始化流程使用,引擎本身不建任务)
    pub fn insert(&self, task: &Task) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let labour_json =
            serde_json::to_string(&task.labour_ids).unwrap_or_else(|_| "[]".to_string());
        conn.execute(
            r#"INSERT INTO task (
                task_id, milestone_id, project_id, title,
                labour_ids, labour_count, work_qty, work_type,
                start_date, end_date, due_date, duration_days,
                sort_order, due_alert_sent, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"#,
            params![
                task.task_id,
                task.milestone_id,
                task.project_id,
                task.title,
                labour_json,
                task.labour_count,
                task.work_qty,
                task.work_type,
                task.start_date.map(format_date),
                task.end_date.map(format_date),
                task.due_date.map(format_date),
                task.duration_days,
                task.sort_order,
                task.due_alert_sent as i64,
                format_datetime(task.created_at),
                format_datetime(task.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 写入重算结果: 起止/到期/工期,可选改写劳务人数
    ///
    /// 到期日恒等于计划结束日 (镜像字段)。
    ///
    /// # 返回
    /// - Err(NotFound): 任务不存在
    pub fn update_schedule(
        &self,
        task_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        duration_days: i64,
        labour_count: Option<i64>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = match labour_count {
            Some(count) => conn.execute(
                r#"UPDATE task
                   SET start_date = ?1, end_date = ?2, due_date = ?2,
                       duration_days = ?3, labour_count = ?4, updated_at = ?5
                   WHERE task_id = ?6"#,
                params![
                    format_date(start),
                    format_date(end),
                    duration_days,
                    count,
                    format_datetime(now()),
                    task_id,
                ],
            )?,
            None => conn.execute(
                r#"UPDATE task
                   SET start_date = ?1, end_date = ?2, due_date = ?2,
                       duration_days = ?3, updated_at = ?4
                   WHERE task_id = ?5"#,
                params![
                    format_date(start),
                    format_date(end),
                    duration_days,
                    format_datetime(now()),
                    task_id,
                ],
            )?,
        };
        if rows == 0 {
            return Err(RepositoryError::not_found("Task", task_id));
        }
        Ok(())
    }

    /// 平移写入: 仅改写起止/到期 (里程碑整体平移使用)
    pub fn update_dates(
        &self,
        task_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"UPDATE task
               SET start_date = ?1, end_date = ?2, due_date = ?2, updated_at = ?3
               WHERE task_id = ?4"#,
            params![
                format_date(start),
                format_date(end),
                format_datetime(now()),
                task_id,
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Task", task_id));
        }
        Ok(())
    }
}
