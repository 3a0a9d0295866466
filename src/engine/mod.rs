// ==========================================
// 工程进度重算引擎 - 引擎层
// ==========================================
// 职责: 实现排期业务规则,不拼 SQL
// 红线: 日期/工期的全部改写集中在本层各引擎
// ==========================================

pub mod aggregate;
pub mod cascade;
pub mod delay;
pub mod duration;
pub mod rebuild;
pub mod repositories;
pub mod reschedule;

// 重导出核心引擎
pub use aggregate::{MilestoneAggregator, MilestoneUpdate};
pub use cascade::{CascadePropagator, CascadeStep};
pub use delay::{DelayApplicator, DelaySummary};
pub use duration::{DurationCalculator, DurationOverrides};
pub use rebuild::{MilestoneWindow, RebuildSummary, ScheduleRebuilder};
pub use repositories::ScheduleRepositories;
pub use reschedule::{RescheduleRequest, RescheduleResult, TaskRescheduler};
