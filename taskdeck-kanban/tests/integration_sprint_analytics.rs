//! Integration tests for the sprint lifecycle and analytics pipeline

use chrono::{Duration, Utc};
use taskdeck_kanban::{
    analytics::{BurndownReport, GetBurndown, GetVelocity, GetWorkload, VelocityReport, WorkloadReport},
    board::CreateBoard,
    column::CreateColumn,
    project::CreateProject,
    sprint::{AddTasksToSprint, CancelSprint, CompleteSprint, CreateSprint, StartSprint},
    task::{AddTask, UpdateTask},
    types::{ActorId, ColumnId, ProjectId, SprintId, TaskId, TaskStatus},
    Execute, KanbanContext, KanbanError,
};
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    ctx: KanbanContext,
    project_id: ProjectId,
    column_id: ColumnId,
}

async fn setup() -> Fixture {
    let temp = TempDir::new().unwrap();
    let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
    let project = CreateProject::new("Mobile App")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let project_id = ProjectId::from_string(project["id"].as_str().unwrap());
    let board = CreateBoard::new(project_id.clone(), "Main")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let column = CreateColumn::new(board["id"].as_str().unwrap(), "Todo")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    Fixture {
        _temp: temp,
        ctx,
        project_id,
        column_id: ColumnId::from_string(column["id"].as_str().unwrap()),
    }
}

async fn add_task(f: &Fixture, title: &str, points: u32, assignee: Option<&str>) -> TaskId {
    let mut cmd = AddTask::new(f.column_id.clone(), title).with_story_points(points);
    if let Some(assignee) = assignee {
        cmd = cmd.with_assignees(vec![ActorId::from(assignee)]);
    }
    let task = cmd.execute(&f.ctx).await.into_result().unwrap();
    TaskId::from_string(task["id"].as_str().unwrap())
}

async fn run_sprint(f: &Fixture, name: &str, task_points: &[u32], complete_all: bool) -> SprintId {
    let now = Utc::now();
    let sprint = CreateSprint::new(f.project_id.clone(), name)
        .with_dates(now, now + Duration::days(10))
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let sprint_id = SprintId::from_string(sprint["id"].as_str().unwrap());

    let mut task_ids = Vec::new();
    for (i, points) in task_points.iter().enumerate() {
        task_ids.push(add_task(f, &format!("{name}-{i}"), *points, None).await);
    }
    AddTasksToSprint::new(sprint_id.clone(), task_ids.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    StartSprint::new(sprint_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();

    if complete_all {
        for task_id in &task_ids {
            UpdateTask::new(task_id.clone())
                .with_status(TaskStatus::Completed)
                .execute(&f.ctx)
                .await
                .into_result()
                .unwrap();
        }
    }
    CompleteSprint::new(sprint_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    sprint_id
}

#[tokio::test]
async fn test_sprint_lifecycle_feeds_velocity() {
    let f = setup().await;

    run_sprint(&f, "S1", &[5, 5], true).await;
    run_sprint(&f, "S2", &[8, 8, 4], true).await;
    // Third sprint finishes nothing
    run_sprint(&f, "S3", &[13], false).await;

    let value = GetVelocity::new(f.project_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let report: VelocityReport = serde_json::from_value(value).unwrap();
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.records[0].completed_points, 10);
    assert_eq!(report.records[1].completed_points, 20);
    assert_eq!(report.records[2].completed_points, 0);
    assert_eq!(report.average_points, 10.0);

    let value = GetVelocity::new(f.project_id.clone())
        .with_last_n(2)
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let report: VelocityReport = serde_json::from_value(value).unwrap();
    assert_eq!(report.average_points, 10.0);
}

#[tokio::test]
async fn test_one_active_sprint_per_project() {
    let f = setup().await;

    let first = CreateSprint::new(f.project_id.clone(), "S1")
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let first_id = SprintId::from_string(first["id"].as_str().unwrap());
    let second = CreateSprint::new(f.project_id.clone(), "S2")
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let second_id = SprintId::from_string(second["id"].as_str().unwrap());

    StartSprint::new(first_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let blocked = StartSprint::new(second_id.clone())
        .execute(&f.ctx)
        .await
        .into_result();
    assert!(matches!(blocked, Err(KanbanError::SprintAlreadyActive { .. })));

    // Cancelling the active sprint frees the slot
    CancelSprint::new(first_id)
        .with_reason("descoped")
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    StartSprint::new(second_id)
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
}

#[tokio::test]
async fn test_burndown_ideal_line_for_committed_sprint() {
    let f = setup().await;
    let now = Utc::now();

    let sprint = CreateSprint::new(f.project_id.clone(), "S")
        .with_dates(now, now + Duration::days(10))
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let sprint_id = SprintId::from_string(sprint["id"].as_str().unwrap());

    let a = add_task(&f, "a", 12, None).await;
    let b = add_task(&f, "b", 8, None).await;
    AddTasksToSprint::new(sprint_id.clone(), vec![a, b])
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    StartSprint::new(sprint_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();

    let value = GetBurndown::new(sprint_id)
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let report: BurndownReport = serde_json::from_value(value).unwrap();
    assert_eq!(report.committed_points, 20);
    assert_eq!(report.points.len(), 11);
    assert_eq!(report.points[0].ideal_remaining, 20.0);
    assert_eq!(report.points[5].ideal_remaining, 10.0);
    assert_eq!(report.points[10].ideal_remaining, 0.0);
}

#[tokio::test]
async fn test_workload_flags_imbalance() {
    let f = setup().await;

    for i in 0..4 {
        add_task(&f, &format!("a{i}"), 1, Some("alice")).await;
    }
    add_task(&f, "b0", 1, Some("bob")).await;
    add_task(&f, "c0", 1, Some("carol")).await;

    let value = GetWorkload::new(f.project_id.clone())
        .execute(&f.ctx)
        .await
        .into_result()
        .unwrap();
    let report: WorkloadReport = serde_json::from_value(value).unwrap();
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.team_average, 2.0);

    let alice = report
        .entries
        .iter()
        .find(|e| e.assignee == ActorId::from("alice"))
        .unwrap();
    assert_eq!(alice.open_tasks, 4);
    assert_eq!(alice.ratio, 2.0);
}
