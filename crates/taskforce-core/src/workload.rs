use crate::{Project, Task, User};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Categorical load bucket derived from a user's current task count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadTier {
    Free,
    Normal,
    Busy,
    Overloaded,
}

impl WorkloadTier {
    pub fn of(count: u32) -> Self {
        match count {
            0 => WorkloadTier::Free,
            1..=2 => WorkloadTier::Normal,
            3..=4 => WorkloadTier::Busy,
            _ => WorkloadTier::Overloaded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub user_id: String,
    pub task_count: u32,
    pub tier: WorkloadTier,
}

/// Per-user active-task counts for one project, valid for one assignment
/// run. Derived from a task snapshot at run start and updated in place as
/// the run commits assignments; never persisted.
#[derive(Debug, Clone)]
pub struct WorkloadIndex {
    counts: HashMap<String, u32>,
}

impl WorkloadIndex {
    /// Count each user's tasks in the project. Tasks in a done column are
    /// skipped unless `count_done_tasks`; unknown columns count as active.
    /// Every user gets an entry, so zero-load members are still candidates.
    pub fn build(users: &[User], tasks: &[Task], project: &Project, count_done_tasks: bool) -> Self {
        let mut counts: HashMap<String, u32> =
            users.iter().map(|u| (u.id.clone(), 0)).collect();

        for task in tasks {
            let Some(assignee) = task.assignee.as_deref() else {
                continue;
            };
            if !count_done_tasks && project.resolve_status(&task.status).is_done() {
                continue;
            }
            if let Some(count) = counts.get_mut(assignee) {
                *count += 1;
            }
        }

        Self { counts }
    }

    pub fn count_of(&self, user_id: &str) -> u32 {
        self.counts.get(user_id).copied().unwrap_or(0)
    }

    pub fn tier_of(&self, user_id: &str) -> WorkloadTier {
        WorkloadTier::of(self.count_of(user_id))
    }

    /// Record a committed assignment so later scoring in the same run sees
    /// the updated load. Counts only ever grow within a run.
    pub fn increment(&mut self, user_id: &str) {
        let count = self.counts.entry(user_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn entry_for(&self, user_id: &str) -> WorkloadEntry {
        let task_count = self.count_of(user_id);
        WorkloadEntry {
            user_id: user_id.to_string(),
            task_count,
            tier: WorkloadTier::of(task_count),
        }
    }
}
