//! Sprint burndown

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Remaining points at the end of one sprint day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurndownPoint {
    /// Day index, 0 is the sprint start
    pub day: i64,
    pub ideal_remaining: f64,
    pub actual_remaining: f64,
}

/// Full burndown series for a sprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurndownReport {
    pub sprint_id: SprintId,
    pub committed_points: u32,
    pub duration_days: i64,
    pub points: Vec<BurndownPoint>,
}

/// Compute the burndown series.
///
/// The ideal line falls linearly from the committed baseline to zero over
/// the sprint. The actual line subtracts the points of tasks completed on
/// or before each day boundary; `completions` pairs story points with
/// completion timestamps.
pub fn burndown_series(
    committed: u32,
    duration_days: i64,
    start: DateTime<Utc>,
    completions: &[(u32, DateTime<Utc>)],
) -> Vec<BurndownPoint> {
    let duration = duration_days.max(1);
    let total = f64::from(committed);

    (0..=duration)
        .map(|day| {
            let ideal = (total * (1.0 - day as f64 / duration as f64)).max(0.0);
            let boundary = start + Duration::days(day);
            let burned: u32 = completions
                .iter()
                .filter(|(_, at)| *at <= boundary)
                .map(|(points, _)| *points)
                .sum();
            BurndownPoint {
                day,
                ideal_remaining: ideal,
                actual_remaining: (total - f64::from(burned)).max(0.0),
            }
        })
        .collect()
}

/// Produce a burndown report for a sprint. The sprint must have been
/// started; an undated sprint has no baseline to burn from.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBurndown {
    /// The sprint ID
    pub sprint_id: SprintId,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl GetBurndown {
    /// Create a new GetBurndown command
    pub fn new(sprint_id: impl Into<SprintId>) -> Self {
        Self {
            sprint_id: sprint_id.into(),
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for GetBurndown {
    fn verb(&self) -> &'static str {
        "burndown"
    }
    fn noun(&self) -> &'static str {
        "analytics"
    }
    fn description(&self) -> &'static str {
        "Compute the burndown series for a sprint"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBurndown {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let sprint = ctx.read_sprint(&self.sprint_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &sprint.project_id,
                Capability::new(Module::Analytics, ActionKind::Read),
            )
            .await?;

            let start = sprint.start_date.ok_or_else(|| {
                KanbanError::invalid_value("sprint", "has not been started")
            })?;
            let end = sprint.end_date.unwrap_or_else(Utc::now);
            let duration = (end - start).num_days().max(1);
            let committed = sprint.committed_points.unwrap_or(0);

            let completions: Vec<(u32, DateTime<Utc>)> = ctx
                .read_sprint_tasks(&self.sprint_id)
                .await?
                .into_iter()
                .filter_map(|t| match (t.story_points, t.completed_at) {
                    (Some(points), Some(at)) => Some((points, at)),
                    _ => None,
                })
                .collect();

            let report = BurndownReport {
                sprint_id: sprint.id,
                committed_points: committed,
                duration_days: duration,
                points: burndown_series(committed, duration, start, &completions),
            };
            Ok(serde_json::to_value(&report)?)
        }
        .await;

        exec::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::column::CreateColumn;
    use crate::project::CreateProject;
    use crate::sprint::{AddTasksToSprint, CreateSprint, StartSprint};
    use crate::task::{AddTask, UpdateTask};
    use crate::types::{ColumnId, TaskId, TaskStatus};
    use tempfile::TempDir;

    #[test]
    fn test_ideal_line_20_points_over_10_days() {
        let series = burndown_series(20, 10, Utc::now(), &[]);
        assert_eq!(series.len(), 11);
        assert_eq!(series[0].ideal_remaining, 20.0);
        assert_eq!(series[5].ideal_remaining, 10.0);
        assert_eq!(series[10].ideal_remaining, 0.0);
        // Nothing completed, so the actual line stays flat
        assert!(series.iter().all(|p| p.actual_remaining == 20.0));
    }

    #[test]
    fn test_actual_line_tracks_completions() {
        let start = Utc::now();
        let completions = vec![
            (5, start + Duration::days(2)),
            (8, start + Duration::days(7)),
        ];
        let series = burndown_series(20, 10, start, &completions);
        assert_eq!(series[1].actual_remaining, 20.0);
        assert_eq!(series[2].actual_remaining, 15.0);
        assert_eq!(series[7].actual_remaining, 7.0);
        assert_eq!(series[10].actual_remaining, 7.0);
    }

    #[test]
    fn test_zero_duration_clamps_to_one_day() {
        let series = burndown_series(10, 0, Utc::now(), &[]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].ideal_remaining, 0.0);
    }

    #[tokio::test]
    async fn test_report_from_started_sprint() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
        let project = CreateProject::new("P")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board = CreateBoard::new(project["id"].as_str().unwrap(), "B")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = CreateColumn::new(board["id"].as_str().unwrap(), "Todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column_id = ColumnId::from_string(column["id"].as_str().unwrap());

        let now = Utc::now();
        let sprint = CreateSprint::new(project["id"].as_str().unwrap(), "S")
            .with_dates(now, now + Duration::days(10))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let sprint_id = SprintId::from_string(sprint["id"].as_str().unwrap());

        let task = AddTask::new(column_id, "t")
            .with_story_points(20)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let task_id = TaskId::from_string(task["id"].as_str().unwrap());
        AddTasksToSprint::new(sprint_id.clone(), vec![task_id.clone()])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        StartSprint::new(sprint_id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        UpdateTask::new(task_id)
            .with_status(TaskStatus::Completed)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let value = GetBurndown::new(sprint_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let report: BurndownReport = serde_json::from_value(value).unwrap();
        assert_eq!(report.committed_points, 20);
        assert_eq!(report.duration_days, 10);
        assert_eq!(report.points[0].ideal_remaining, 20.0);
        // Completed on day zero
        assert_eq!(report.points[1].actual_remaining, 0.0);
    }

    #[tokio::test]
    async fn test_undated_sprint_has_no_burndown() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
        let project = CreateProject::new("P")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let sprint = CreateSprint::new(project["id"].as_str().unwrap(), "S")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = GetBurndown::new(SprintId::from_string(sprint["id"].as_str().unwrap()))
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::InvalidValue { .. })));
    }
}
