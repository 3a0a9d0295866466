// ==========================================
// 工程进度重算引擎 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod delay_log_repo;
pub mod error;
pub mod milestone_repo;
pub mod project_repo;
pub mod task_repo;

// 重导出核心仓储
pub use delay_log_repo::DelayLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use milestone_repo::MilestoneRepository;
pub use project_repo::ProjectRepository;
pub use task_repo::TaskRepository;
