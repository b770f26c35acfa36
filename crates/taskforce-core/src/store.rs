use crate::{Project, Result, Skill, Task, User};
use async_trait::async_trait;

/// Explicit per-request context threaded into every collaborator call.
/// Replaces ambient session state: whoever triggers a run is named here
/// and carried on tracing spans.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub actor: String,
}

impl RequestContext {
    pub fn new(actor: impl Into<String>) -> Self {
        Self { actor: actor.into() }
    }

    /// Context for internally-triggered work (startup seeding, tests).
    pub fn system() -> Self {
        Self {
            actor: "system".to_string(),
        }
    }
}

/// Persistence collaborator the engine reads snapshots from and writes a
/// single field (task assignee) back to. Reads are taken once per run;
/// the engine never re-validates staleness before committing, so the
/// store is responsible for serializing writes to a given task.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_project(&self, ctx: &RequestContext, project_id: &str)
        -> Result<Option<Project>>;

    async fn get_project_members(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<User>>;

    /// Tasks of a project; with `unassigned_only`, only those without an
    /// assignee.
    async fn get_project_tasks(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        unassigned_only: bool,
    ) -> Result<Vec<Task>>;

    async fn get_task(&self, ctx: &RequestContext, task_id: &str) -> Result<Option<Task>>;

    /// Overwrites the task's assignee and returns the updated task.
    async fn set_task_assignee(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        user_id: &str,
    ) -> Result<Task>;

    async fn list_skills(&self, ctx: &RequestContext) -> Result<Vec<Skill>>;
}
