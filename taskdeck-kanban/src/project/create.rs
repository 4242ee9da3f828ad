//! CreateProject command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{Project, Visibility};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Create a new project
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateProject {
    /// The project name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Visibility (defaults to team)
    pub visibility: Option<Visibility>,
    /// Budget, uninterpreted by the engine
    pub budget: Option<f64>,
}

impl CreateProject {
    /// Create a new CreateProject command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: None,
            budget: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the visibility
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Set the budget
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }
}

impl Operation for CreateProject {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "project"
    }
    fn description(&self) -> &'static str {
        "Create a new project"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CreateProject {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            ctx.ensure_directories().await?;

            let mut project = Project::new(&self.name);
            if let Some(desc) = &self.description {
                project = project.with_description(desc);
            }
            if let Some(visibility) = self.visibility {
                project = project.with_visibility(visibility);
            }
            if let Some(budget) = self.budget {
                project = project.with_budget(budget);
            }

            ctx.write_project(&project).await?;
            Ok(serde_json::to_value(&project)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
