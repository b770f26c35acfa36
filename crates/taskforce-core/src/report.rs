use serde::{Deserialize, Serialize};

/// One successful assignment within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub task_id: String,
    pub task_title: String,
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
    pub score: f64,
}

/// One task the run could not assign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentFailure {
    pub task_id: String,
    pub task_title: String,
    pub message: String,
}

/// Aggregated outcome of a bulk assignment run. Assembled by the engine,
/// no behavior beyond aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub assignments: Vec<AssignmentResult>,
    pub errors: Vec<AssignmentFailure>,
}

impl AssignmentReport {
    pub fn total_assigned(&self) -> usize {
        self.assignments.len()
    }

    pub fn total_errors(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn record_success(&mut self, result: AssignmentResult) {
        self.assignments.push(result);
    }

    pub(crate) fn record_failure(
        &mut self,
        task_id: impl Into<String>,
        task_title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(AssignmentFailure {
            task_id: task_id.into(),
            task_title: task_title.into(),
            message: message.into(),
        });
    }
}
