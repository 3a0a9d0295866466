// ==========================================
// 工程进度重算引擎 - 领域层
// ==========================================
// 职责: 实体定义与少量纯领域辅助方法
// 红线: 领域层不访问数据库,不做业务编排
// ==========================================

pub mod delay_log;
pub mod milestone;
pub mod project;
pub mod task;
pub mod types;

// 重导出领域实体
pub use delay_log::DelayLogEntry;
pub use milestone::Milestone;
pub use project::Project;
pub use task::Task;
