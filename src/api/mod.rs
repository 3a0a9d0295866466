// ==========================================
// 工程进度重算引擎 - API 层
// ==========================================
// 职责: 提供对外钩子入口,供上层请求处理器同进程调用
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use schedule_api::ScheduleApi;
