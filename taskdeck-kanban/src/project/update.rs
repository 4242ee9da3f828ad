//! UpdateProject command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ProjectId, ProjectStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Update project fields. Status transitions are caller-driven; the engine
/// records whatever the caller sets.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProject {
    /// The project ID
    pub id: ProjectId,
    /// New name
    pub name: Option<String>,
    /// New status
    pub status: Option<ProjectStatus>,
    /// New budget
    pub budget: Option<f64>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl UpdateProject {
    /// Create a new UpdateProject command
    pub fn new(id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            status: None,
            budget: None,
            actor: None,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for UpdateProject {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "project"
    }
    fn description(&self) -> &'static str {
        "Update project fields"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateProject {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut project = ctx.read_project(&self.id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &project.id,
                Capability::new(Module::Project, ActionKind::Update),
            )
            .await?;

            if let Some(name) = &self.name {
                project.name = name.clone();
            }
            if let Some(status) = self.status {
                project.status = status;
            }
            if let Some(budget) = self.budget {
                project.budget = Some(budget);
            }

            ctx.write_project(&project).await?;
            Ok(serde_json::to_value(&project)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
