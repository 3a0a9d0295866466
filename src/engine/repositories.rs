// ==========================================
// 工程进度重算引擎 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合重算引擎所需的全部 Repository
// 目标: 减少各引擎构造函数参数数量,便于测试注入
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::repository::{
    DelayLogRepository, MilestoneRepository, ProjectRepository, RepositoryResult, TaskRepository,
};

/// 重算引擎仓储集合
///
/// 四个实体仓储共享同一个底层连接,
/// 由引擎层按需取用。
#[derive(Clone)]
pub struct ScheduleRepositories {
    /// 项目仓储
    pub project_repo: Arc<ProjectRepository>,
    /// 里程碑仓储
    pub milestone_repo: Arc<MilestoneRepository>,
    /// 任务仓储
    pub task_repo: Arc<TaskRepository>,
    /// 延误日志仓储
    pub delay_log_repo: Arc<DelayLogRepository>,
}

impl ScheduleRepositories {
    /// 创建新的仓储集合
    pub fn new(
        project_repo: Arc<ProjectRepository>,
        milestone_repo: Arc<MilestoneRepository>,
        task_repo: Arc<TaskRepository>,
        delay_log_repo: Arc<DelayLogRepository>,
    ) -> Self {
        Self {
            project_repo,
            milestone_repo,
            task_repo,
            delay_log_repo,
        }
    }

    /// 从共享连接构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            project_repo: Arc::new(ProjectRepository::from_connection(conn.clone())),
            milestone_repo: Arc::new(MilestoneRepository::from_connection(conn.clone())),
            task_repo: Arc::new(TaskRepository::from_connection(conn.clone())),
            delay_log_repo: Arc::new(DelayLogRepository::from_connection(conn)),
        }
    }

    /// 从数据库路径构建 (打开单一共享连接)
    pub fn from_db_path(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(crate::repository::RepositoryError::from)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }
}
