// ==========================================
// 工程进度重算引擎 - 配置层
// ==========================================
// 职责: 引擎级常量与可注入的工效配置
// ==========================================

pub mod productivity;

// 重导出配置类型与常量
pub use productivity::{
    ProductivityRate, ProductivityTable, DEFAULT_MILESTONE_DURATION_DAYS,
    DEFAULT_TASK_DURATION_DAYS, GENERAL_WORK_TYPE, SEQUENCE_BUFFER_DAYS,
};
