use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A column configured on a project's board. Tasks reference columns by id;
/// `done` columns are excluded from workload counting by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub done: bool,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            done: false,
        }
    }

    pub fn done(mut self) -> Self {
        self.done = true;
        self
    }
}

/// A task's status resolved against its project's configured columns.
/// Tasks carry a raw column id; anything not in the project's column list
/// resolves to `Unknown` rather than being accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedStatus<'a> {
    Known(&'a Column),
    Unknown,
}

impl ResolvedStatus<'_> {
    /// Whether the status represents completed work. Unknown columns are
    /// treated as active so stale column ids never hide load.
    pub fn is_done(&self) -> bool {
        match self {
            ResolvedStatus::Known(column) => column.done,
            ResolvedStatus::Unknown => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            columns,
            created_at: Utc::now(),
        }
    }

    pub fn resolve_status(&self, raw: &str) -> ResolvedStatus<'_> {
        self.columns
            .iter()
            .find(|c| c.id == raw)
            .map(ResolvedStatus::Known)
            .unwrap_or(ResolvedStatus::Unknown)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Raw column id; resolve against the project via `Project::resolve_status`.
    pub status: String,
    pub priority: Priority,
    pub required_skills: BTreeSet<String>,
    pub assignee: Option<String>,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        project_id: impl Into<String>,
        title: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            status: status.into(),
            priority: Priority::Medium,
            required_skills: BTreeSet::new(),
            assignee: None,
            project_id: project_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_required_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assignee = Some(user_id.into());
        self
    }

    pub fn assign_to(&mut self, user_id: impl Into<String>) {
        self.assignee = Some(user_id.into());
        self.updated_at = Utc::now();
    }
}
