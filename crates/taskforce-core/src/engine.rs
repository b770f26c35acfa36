use crate::{
    AssignmentReport, AssignmentResult, Error, MatchScorer, Project, ProjectStore, RequestContext,
    Result, ScoreOutcome, Skill, SkillCatalog, Task, User, WorkloadEntry, WorkloadIndex,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Count tasks in done columns toward a user's load.
    pub count_done_tasks: bool,
    /// Weight of the per-task load penalty subtracted from skill coverage.
    pub penalty_weight: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            count_done_tasks: false,
            penalty_weight: 1.0,
        }
    }
}

/// Cooperative cancellation for a bulk run, checked once per task
/// boundary. Assignments committed before the flag is observed stay
/// committed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-member row for the workload analysis view.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadAnalysisEntry {
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub task_count: u32,
    pub tier: crate::WorkloadTier,
    pub skills: Vec<SkillSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub id: String,
    pub name: String,
    pub level: u8,
}

/// Consistent snapshot of one project taken at the start of a run.
struct RunState {
    project: Project,
    members: Vec<User>,
    tasks: Vec<Task>,
    catalog: SkillCatalog,
    workload: WorkloadIndex,
}

/// Orchestrates single-task and bulk auto-assignment against a
/// `ProjectStore`. Each run reads one snapshot, scores candidates with the
/// `MatchScorer`, and writes back one field (the task assignee) per
/// successful assignment.
#[derive(Clone)]
pub struct AssignmentEngine {
    store: Arc<dyn ProjectStore>,
    scorer: MatchScorer,
    options: EngineOptions,
}

impl AssignmentEngine {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self::with_options(store, EngineOptions::default())
    }

    pub fn with_options(store: Arc<dyn ProjectStore>, options: EngineOptions) -> Self {
        Self {
            store,
            scorer: MatchScorer::new(options.penalty_weight),
            options,
        }
    }

    async fn load_run_state(&self, ctx: &RequestContext, project_id: &str) -> Result<RunState> {
        let project = self
            .store
            .get_project(ctx, project_id)
            .await?
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;

        let mut members = self.store.get_project_members(ctx, project_id).await?;
        // Ascending id order makes tie-breaks reproducible across runs.
        members.sort_by(|a, b| a.id.cmp(&b.id));

        let tasks = self.store.get_project_tasks(ctx, project_id, false).await?;
        let catalog = SkillCatalog::new(self.store.list_skills(ctx).await?);
        let workload =
            WorkloadIndex::build(&members, &tasks, &project, self.options.count_done_tasks);

        Ok(RunState {
            project,
            members,
            tasks,
            catalog,
            workload,
        })
    }

    /// Highest-scoring eligible member; ties go to the lowest user id.
    fn pick_candidate<'a>(
        &self,
        task: &Task,
        members: &'a [User],
        workload: &WorkloadIndex,
        catalog: &SkillCatalog,
    ) -> Option<(&'a User, f64)> {
        let mut best: Option<(&User, f64)> = None;
        for user in members {
            if let ScoreOutcome::Eligible(score) =
                self.scorer.score(task, user, workload, catalog)
            {
                // Members are sorted ascending by id, so a strict
                // comparison keeps the lowest id on ties.
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((user, score));
                }
            }
        }
        best
    }

    async fn commit(
        &self,
        ctx: &RequestContext,
        task: &Task,
        user: &User,
        score: f64,
        workload: &mut WorkloadIndex,
    ) -> Result<AssignmentResult> {
        self.store.set_task_assignee(ctx, &task.id, &user.id).await?;
        workload.increment(&user.id);

        tracing::info!(
            actor = %ctx.actor,
            task_id = %task.id,
            user_id = %user.id,
            score,
            "assigned task: {} -> {} {}",
            task.title,
            user.firstname,
            user.lastname
        );

        Ok(AssignmentResult {
            task_id: task.id.clone(),
            task_title: task.title.clone(),
            user_id: user.id.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            score,
        })
    }

    /// Assign one task to the best-fitting project member. An existing
    /// assignee is overwritten; the frontend exposes auto-assign without
    /// pre-checking state, so re-assignment is intentional and logged.
    pub async fn assign_single(
        &self,
        ctx: &RequestContext,
        task_id: &str,
    ) -> Result<AssignmentResult> {
        let task = self
            .store
            .get_task(ctx, task_id)
            .await?
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        let mut state = self.load_run_state(ctx, &task.project_id).await?;

        if let Some(previous) = task.assignee.as_deref() {
            tracing::info!(
                task_id = %task.id,
                previous_assignee = %previous,
                "task already assigned, overwriting"
            );
        }

        let (user, score) = self
            .pick_candidate(&task, &state.members, &state.workload, &state.catalog)
            .ok_or_else(|| Error::NoEligibleUser(task.id.clone()))?;

        self.commit(ctx, &task, user, score, &mut state.workload).await
    }

    /// Assign every unassigned task in the project, in creation order,
    /// against a shared workload index so each commit shifts the scoring
    /// of the tasks after it. Per-task failures go into the report; only
    /// a missing project aborts the call.
    pub async fn assign_all_unassigned(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        cancel: &CancelFlag,
    ) -> Result<AssignmentReport> {
        let mut state = self.load_run_state(ctx, project_id).await?;

        let mut pending: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| t.assignee.is_none())
            .cloned()
            .collect();
        // Creation order, id as a stable secondary key.
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        tracing::info!(
            actor = %ctx.actor,
            project_id = %project_id,
            pending = pending.len(),
            "starting bulk auto-assignment for project {}",
            state.project.name
        );

        let mut report = AssignmentReport::default();

        for task in &pending {
            if cancel.is_cancelled() {
                tracing::info!(
                    project_id = %project_id,
                    assigned = report.total_assigned(),
                    "bulk assignment cancelled"
                );
                break;
            }

            match self.pick_candidate(task, &state.members, &state.workload, &state.catalog) {
                Some((user, score)) => {
                    match self.commit(ctx, task, user, score, &mut state.workload).await {
                        Ok(result) => report.record_success(result),
                        Err(e) => {
                            tracing::error!(task_id = %task.id, "assignment commit failed: {}", e);
                            report.record_failure(&task.id, &task.title, e.to_string());
                        }
                    }
                }
                None => {
                    report.record_failure(&task.id, &task.title, "no eligible user");
                }
            }
        }

        tracing::info!(
            project_id = %project_id,
            assigned = report.total_assigned(),
            errors = report.total_errors(),
            "bulk auto-assignment finished"
        );

        Ok(report)
    }

    /// Per-member load and skill summary for the analysis view.
    pub async fn workload_analysis(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<WorkloadAnalysisEntry>> {
        let state = self.load_run_state(ctx, project_id).await?;

        let entries = state
            .members
            .iter()
            .map(|user| {
                let WorkloadEntry {
                    task_count, tier, ..
                } = state.workload.entry_for(&user.id);

                let skills = user
                    .skills
                    .iter()
                    .map(|(skill_id, level)| {
                        let name = match state.catalog.lookup(skill_id) {
                            Ok(Skill { name, .. }) => name.clone(),
                            Err(_) => {
                                tracing::warn!(
                                    user_id = %user.id,
                                    skill_id = %skill_id,
                                    "user holds unknown skill, reporting raw id"
                                );
                                skill_id.clone()
                            }
                        };
                        SkillSummary {
                            id: skill_id.clone(),
                            name,
                            level: *level,
                        }
                    })
                    .collect();

                WorkloadAnalysisEntry {
                    user_id: user.id.clone(),
                    firstname: user.firstname.clone(),
                    lastname: user.lastname.clone(),
                    email: user.email.clone(),
                    task_count,
                    tier,
                    skills,
                }
            })
            .collect();

        Ok(entries)
    }
}
