//! CreateSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ProjectId, Sprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Create a sprint in planning state
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateSprint {
    /// The owning project ID
    pub project_id: ProjectId,
    /// Sprint name
    pub name: String,
    /// Planned start date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Planned end date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Capacity target in story points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_points: Option<u32>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl CreateSprint {
    /// Create a new CreateSprint command
    pub fn new(project_id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            start_date: None,
            end_date: None,
            capacity_points: None,
            actor: None,
        }
    }

    /// Set the planned dates
    pub fn with_dates(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Set the capacity target
    pub fn with_capacity(mut self, points: u32) -> Self {
        self.capacity_points = Some(points);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for CreateSprint {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Create a sprint in planning state"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CreateSprint {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            if self.name.trim().is_empty() {
                return Err(KanbanError::invalid_value("name", "must not be empty"));
            }
            if let (Some(from), Some(to)) = (self.start_date, self.end_date) {
                if to <= from {
                    return Err(KanbanError::invalid_value(
                        "end_date",
                        "must be after start_date",
                    ));
                }
            }

            // Validates the project exists and is not deleted
            ctx.read_project(&self.project_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &self.project_id,
                Capability::new(Module::Sprint, ActionKind::Create),
            )
            .await?;

            let mut sprint = Sprint::new(self.project_id.clone(), self.name.trim());
            if let (Some(from), Some(to)) = (self.start_date, self.end_date) {
                sprint = sprint.with_dates(from, to);
            }
            if let Some(points) = self.capacity_points {
                sprint = sprint.with_capacity(points);
            }
            ctx.write_sprint(&sprint).await?;

            Ok(serde_json::to_value(&sprint)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
