// ==========================================
// 工程项目进度动态重算引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 进度重算子系统 (任务 → 里程碑 → 项目的日期传播)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排期规则
pub mod engine;

// 配置层 - 工效表与引擎常量
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一/建表)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 钩子入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{DelayLogEntry, Milestone, Project, Task};

// 配置
pub use config::{ProductivityRate, ProductivityTable};

// 引擎
pub use engine::{
    CascadePropagator, DelayApplicator, DurationCalculator, MilestoneAggregator,
    ScheduleRebuilder, ScheduleRepositories, TaskRescheduler,
};

// 引擎结果投影
pub use engine::{
    CascadeStep, DelaySummary, MilestoneUpdate, MilestoneWindow, RebuildSummary,
    RescheduleRequest, RescheduleResult,
};

// API
pub use api::{ApiError, ApiResult, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工程项目进度动态重算引擎";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
