// ==========================================
// 全量顺排引擎测试
// ==========================================
// 测试范围:
// 1. 顺序排布与 1 天缓冲 (任务间 / 里程碑间)
// 2. 既有日期被完全忽略
// 3. 空里程碑的点窗口
// 4. 幂等性与项目结束日写入
// ==========================================

mod test_helpers;

use construction_scheduler::config::ProductivityTable;
use construction_scheduler::engine::ScheduleRebuilder;
use construction_scheduler::repository::RepositoryError;
use test_helpers::{date, labour_ids, milestone_fixture, project_fixture, setup_repositories, task_fixture};

fn rebuilder(
    repos: &construction_scheduler::engine::ScheduleRepositories,
) -> ScheduleRebuilder {
    ScheduleRebuilder::new(
        repos.project_repo.clone(),
        repos.milestone_repo.clone(),
        repos.task_repo.clone(),
        ProductivityTable::default(),
    )
}

/// 工期 N 天的 general 任务 (1 人, 工程量 N)
fn task_with_duration(task_id: &str, milestone_id: &str, sort_order: i64, days: f64) -> construction_scheduler::Task {
    let mut task = task_fixture(task_id);
    task.milestone_id = Some(milestone_id.to_string());
    task.project_id = Some("p1".to_string());
    task.labour_ids = labour_ids(1);
    task.work_qty = Some(days);
    task.sort_order = sort_order;
    task
}

#[test]
fn test_sequential_layout_with_buffers() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m1", "p1", 1))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m2", "p1", 2))
        .unwrap();
    // 每个里程碑两个任务: 3 天 + 4 天
    repos.task_repo.insert(&task_with_duration("t1", "m1", 1, 3.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t2", "m1", 2, 4.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t3", "m2", 1, 3.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t4", "m2", 2, 4.0)).unwrap();

    let summary = rebuilder(&repos).rebuild("p1").unwrap();

    assert_eq!(summary.tasks_updated, 4);
    assert_eq!(summary.milestones.len(), 2);

    // M1: start+3+1+4 = start+8
    assert_eq!(summary.milestones[0].start_date, date(2025, 1, 1));
    assert_eq!(summary.milestones[0].target_date, date(2025, 1, 9));
    // M2 从 M1 目标日 + 1 开始
    assert_eq!(summary.milestones[1].start_date, date(2025, 1, 10));
    assert_eq!(summary.milestones[1].target_date, date(2025, 1, 18));

    // 任务首尾相接,任务间 1 天缓冲
    let t1 = repos.task_repo.find_by_id("t1").unwrap();
    let t2 = repos.task_repo.find_by_id("t2").unwrap();
    assert_eq!(t1.start_date, Some(date(2025, 1, 1)));
    assert_eq!(t1.end_date, Some(date(2025, 1, 4)));
    assert_eq!(t2.start_date, Some(date(2025, 1, 5)));
    assert_eq!(t2.end_date, Some(date(2025, 1, 9)));

    // 项目结束日 = 最后一个里程碑目标日
    assert_eq!(summary.project_end, Some(date(2025, 1, 18)));
    let project = repos.project_repo.find_by_id("p1").unwrap();
    assert_eq!(project.end_date, Some(date(2025, 1, 18)));
}

#[test]
fn test_rebuild_ignores_existing_dates() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m1", "p1", 1))
        .unwrap();

    let mut task = task_with_duration("t1", "m1", 1, 2.0);
    // 既有日期与顺排结果相去甚远,必须被忽略
    task.start_date = Some(date(2030, 6, 1));
    task.end_date = Some(date(2030, 7, 1));
    repos.task_repo.insert(&task).unwrap();

    let summary = rebuilder(&repos).rebuild("p1").unwrap();
    assert_eq!(summary.milestones[0].start_date, date(2025, 1, 1));

    let stored = repos.task_repo.find_by_id("t1").unwrap();
    assert_eq!(stored.start_date, Some(date(2025, 1, 1)));
    assert_eq!(stored.end_date, Some(date(2025, 1, 3)));
    assert_eq!(stored.duration_days, Some(2));
}

#[test]
fn test_empty_milestone_yields_point_window() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m1", "p1", 1))
        .unwrap();
    // m2 为空里程碑
    repos
        .milestone_repo
        .insert(&milestone_fixture("m2", "p1", 2))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m3", "p1", 3))
        .unwrap();
    repos.task_repo.insert(&task_with_duration("t1", "m1", 1, 3.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t3", "m3", 1, 2.0)).unwrap();

    let summary = rebuilder(&repos).rebuild("p1").unwrap();

    // m1: [01-01, 01-04]; m2: 点窗口 01-05; m3: 从 01-06 开始
    assert_eq!(summary.milestones[1].start_date, date(2025, 1, 5));
    assert_eq!(summary.milestones[1].target_date, date(2025, 1, 5));
    assert_eq!(summary.milestones[1].task_count, 0);
    assert_eq!(summary.milestones[2].start_date, date(2025, 1, 6));
}

#[test]
fn test_rebuild_is_idempotent() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m1", "p1", 1))
        .unwrap();
    repos
        .milestone_repo
        .insert(&milestone_fixture("m2", "p1", 2))
        .unwrap();
    repos.task_repo.insert(&task_with_duration("t1", "m1", 1, 3.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t2", "m2", 1, 5.0)).unwrap();

    let engine = rebuilder(&repos);
    let first = engine.rebuild("p1").unwrap();
    let second = engine.rebuild("p1").unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_project_without_milestones_leaves_end_date_untouched() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();

    let summary = rebuilder(&repos).rebuild("p1").unwrap();
    assert!(summary.milestones.is_empty());
    assert_eq!(summary.project_end, None);

    let project = repos.project_repo.find_by_id("p1").unwrap();
    assert_eq!(project.end_date, None);
}

#[test]
fn test_missing_project_reports_not_found() {
    let (_tmp, repos) = setup_repositories();
    let err = rebuilder(&repos).rebuild("ghost").unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_all_windows_end_after_start() {
    let (_tmp, repos) = setup_repositories();
    repos
        .project_repo
        .insert(&project_fixture("p1", Some(date(2025, 1, 1))))
        .unwrap();
    for (mid, order) in [("m1", 1), ("m2", 2), ("m3", 3)] {
        repos
            .milestone_repo
            .insert(&milestone_fixture(mid, "p1", order))
            .unwrap();
    }
    repos.task_repo.insert(&task_with_duration("t1", "m1", 1, 7.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t2", "m2", 1, 1.0)).unwrap();
    repos.task_repo.insert(&task_with_duration("t3", "m2", 2, 9.0)).unwrap();

    let summary = rebuilder(&repos).rebuild("p1").unwrap();
    for window in &summary.milestones {
        assert!(window.target_date >= window.start_date);
    }
    for task_id in ["t1", "t2", "t3"] {
        let task = repos.task_repo.find_by_id(task_id).unwrap();
        assert!(task.end_date.unwrap() >= task.start_date.unwrap());
        assert_eq!(task.due_date, task.end_date);
    }
}
