// ==========================================
// 单任务重排引擎测试
// ==========================================
// 测试范围:
// 1. 劳务人数变更触发的工期重算
// 2. 延误顺延与指定开始日
// 3. 到期日镜像与 NotFound 语义
// ==========================================

mod test_helpers;

use construction_scheduler::config::ProductivityTable;
use construction_scheduler::engine::{RescheduleRequest, TaskRescheduler};
use construction_scheduler::repository::RepositoryError;
use construction_scheduler::ScheduleApi;
use test_helpers::{date, labour_ids, setup_repositories, task_fixture};

#[test]
fn test_labour_change_recomputes_duration() {
    let (_tmp, repos) = setup_repositories();

    // 10 cum 开挖, 2 人, 工效 2.5 → 2 天
    let mut task = task_fixture("t1");
    task.work_qty = Some(10.0);
    task.work_type = "excavation".to_string();
    task.labour_ids = labour_ids(2);
    task.start_date = Some(date(2025, 3, 1));
    task.end_date = Some(date(2025, 3, 3));
    repos.task_repo.insert(&task).unwrap();

    let rescheduler = TaskRescheduler::new(repos.task_repo.clone(), ProductivityTable::default());
    let result = rescheduler
        .reschedule("t1", &RescheduleRequest::default())
        .unwrap();

    assert_eq!(result.duration_days, 2);
    assert_eq!(result.start_date, date(2025, 3, 1));
    assert_eq!(result.end_date, date(2025, 3, 3));

    // 加到 4 人 → 1 天
    let request = RescheduleRequest {
        new_labour_count: Some(4),
        ..Default::default()
    };
    let result = rescheduler.reschedule("t1", &request).unwrap();
    assert_eq!(result.duration_days, 1);
    assert_eq!(result.labour_count, 4);
    assert_eq!(result.end_date, date(2025, 3, 2));

    // 人数落库,后续推算沿用
    let stored = repos.task_repo.find_by_id("t1").unwrap();
    assert_eq!(stored.labour_count, Some(4));
    assert_eq!(stored.duration_days, Some(1));
}

#[test]
fn test_delay_shifts_base_start() {
    let (_tmp, repos) = setup_repositories();

    let mut task = task_fixture("t1");
    task.work_qty = Some(10.0);
    task.work_type = "excavation".to_string();
    task.labour_ids = labour_ids(2);
    task.start_date = Some(date(2025, 3, 1));
    task.end_date = Some(date(2025, 3, 3));
    repos.task_repo.insert(&task).unwrap();

    let rescheduler = TaskRescheduler::new(repos.task_repo.clone(), ProductivityTable::default());
    let request = RescheduleRequest {
        delay_days: Some(7),
        ..Default::default()
    };
    let result = rescheduler.reschedule("t1", &request).unwrap();

    assert_eq!(result.start_date, date(2025, 3, 8));
    assert_eq!(result.end_date, date(2025, 3, 10));
    assert_eq!(result.delay_applied, 7);
}

#[test]
fn test_start_override_wins_over_existing_start() {
    let (_tmp, repos) = setup_repositories();

    let mut task = task_fixture("t1");
    task.work_qty = Some(4.0);
    task.labour_ids = labour_ids(1);
    task.start_date = Some(date(2025, 3, 1));
    repos.task_repo.insert(&task).unwrap();

    let rescheduler = TaskRescheduler::new(repos.task_repo.clone(), ProductivityTable::default());
    let request = RescheduleRequest {
        start_override: Some(date(2025, 6, 1)),
        ..Default::default()
    };
    let result = rescheduler.reschedule("t1", &request).unwrap();

    assert_eq!(result.start_date, date(2025, 6, 1));
    assert_eq!(result.end_date, date(2025, 6, 5));
}

#[test]
fn test_due_date_mirrors_end_date() {
    let (_tmp, repos) = setup_repositories();

    let mut task = task_fixture("t1");
    task.work_qty = Some(5.0);
    task.labour_ids = labour_ids(1);
    task.start_date = Some(date(2025, 3, 1));
    repos.task_repo.insert(&task).unwrap();

    let rescheduler = TaskRescheduler::new(repos.task_repo.clone(), ProductivityTable::default());
    rescheduler
        .reschedule("t1", &RescheduleRequest::default())
        .unwrap();

    let stored = repos.task_repo.find_by_id("t1").unwrap();
    assert_eq!(stored.due_date, stored.end_date);
    assert!(stored.end_date.unwrap() >= stored.start_date.unwrap());
}

#[test]
fn test_missing_task_reports_not_found() {
    let (_tmp, repos) = setup_repositories();

    let rescheduler = TaskRescheduler::new(repos.task_repo.clone(), ProductivityTable::default());
    let err = rescheduler
        .reschedule("ghost", &RescheduleRequest::default())
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_labour_change_hook_via_api() {
    let (_tmp, repos) = setup_repositories();

    let mut task = task_fixture("t1");
    task.work_qty = Some(12.0);
    task.work_type = "masonry".to_string(); // 工效 1.2
    task.labour_ids = labour_ids(2);
    task.start_date = Some(date(2025, 4, 1));
    repos.task_repo.insert(&task).unwrap();

    let api = ScheduleApi::new(repos.clone(), ProductivityTable::default());

    // 2 人: ceil(12 / 2.4) = 5 天; 5 人: ceil(12 / 6) = 2 天
    let result = api.on_labour_change("t1", 5).unwrap();
    assert_eq!(result.duration_days, 2);
    assert_eq!(result.end_date, date(2025, 4, 3));

    // 非正人数不报错,按 1 人处理
    let result = api.on_labour_change("t1", 0).unwrap();
    assert_eq!(result.duration_days, 10);
    assert_eq!(result.labour_count, 1);
}
