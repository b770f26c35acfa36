use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use taskforce_core::{
    Error, Project, ProjectStore, RequestContext, Result, Skill, Task, User,
};

/// In-memory `ProjectStore`. Each table sits behind its own lock; writes to
/// a task take the write guard for the whole mutation, which serializes
/// concurrent assignee updates (last write wins, as the engine expects).
#[derive(Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<String, Project>>,
    tasks: RwLock<HashMap<String, Task>>,
    users: RwLock<HashMap<String, User>>,
    /// project id -> member user ids, in insertion order.
    memberships: RwLock<HashMap<String, Vec<String>>>,
    skills: RwLock<HashMap<String, Skill>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_project(&self, project: Project) {
        let mut projects = self.projects.write().await;
        projects.insert(project.id.clone(), project);
    }

    pub async fn insert_task(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task);
    }

    pub async fn insert_user(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
    }

    pub async fn insert_skill(&self, skill: Skill) {
        let mut skills = self.skills.write().await;
        skills.insert(skill.id.clone(), skill);
    }

    pub async fn add_member(&self, project_id: &str, user_id: &str) {
        let mut memberships = self.memberships.write().await;
        let members = memberships.entry(project_id.to_string()).or_default();
        if !members.iter().any(|id| id == user_id) {
            members.push(user_id.to_string());
        }
    }

    /// Make every subsequent write fail with a persistence error. Lets
    /// tests exercise the engine's per-task error capture.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Persistence("write rejected by store".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn get_project(
        &self,
        _ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(project_id).cloned())
    }

    async fn get_project_members(
        &self,
        _ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<User>> {
        let memberships = self.memberships.read().await;
        let users = self.users.read().await;

        let member_ids = memberships.get(project_id).cloned().unwrap_or_default();
        let mut members = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            match users.get(&id) {
                Some(user) => members.push(user.clone()),
                None => {
                    tracing::warn!(project_id, user_id = %id, "membership references missing user");
                }
            }
        }
        Ok(members)
    }

    async fn get_project_tasks(
        &self,
        _ctx: &RequestContext,
        project_id: &str,
        unassigned_only: bool,
    ) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .filter(|t| !unassigned_only || t.assignee.is_none())
            .cloned()
            .collect())
    }

    async fn get_task(&self, _ctx: &RequestContext, task_id: &str) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }

    async fn set_task_assignee(
        &self,
        ctx: &RequestContext,
        task_id: &str,
        user_id: &str,
    ) -> Result<Task> {
        self.check_writable()?;

        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        task.assign_to(user_id);
        tracing::debug!(
            actor = %ctx.actor,
            task_id,
            user_id,
            "assignee updated"
        );
        Ok(task.clone())
    }

    async fn list_skills(&self, _ctx: &RequestContext) -> Result<Vec<Skill>> {
        let skills = self.skills.read().await;
        Ok(skills.values().cloned().collect())
    }
}
