use chrono::{Duration, Utc};
use std::sync::Arc;

use taskforce_core::{
    AssignmentEngine, CancelFlag, Column, Error, Project, ProjectStore, RequestContext, Skill,
    Task, User, WorkloadTier,
};
use taskforce_store::MemoryStore;

fn ctx() -> RequestContext {
    RequestContext::new("tester")
}

fn kanban_columns() -> Vec<Column> {
    vec![
        Column::new("todo", "To Do"),
        Column::new("doing", "In Progress"),
        Column::new("done", "Done").done(),
    ]
}

async fn seed_project(store: &MemoryStore) -> Project {
    let project = Project::new("Website Redesign", kanban_columns());
    store.insert_project(project.clone()).await;

    for skill in [
        Skill::new("js", "JavaScript", "frontend"),
        Skill::new("rust", "Rust", "backend"),
        Skill::new("design", "Design", "creative"),
    ] {
        store.insert_skill(skill).await;
    }

    project
}

async fn seed_member(store: &MemoryStore, project: &Project, user: User) {
    store.add_member(&project.id, &user.id).await;
    store.insert_user(user).await;
}

/// Two tasks with distinct creation timestamps so batch order is fixed.
fn ordered_tasks(project: &Project, titles: &[&str], skills: &[&str]) -> Vec<Task> {
    let base = Utc::now();
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let mut task = Task::new(&project.id, *title, "todo")
                .with_required_skills(skills.iter().copied());
            task.created_at = base + Duration::milliseconds(i as i64);
            task
        })
        .collect()
}

// ============================================================================
// Single assignment
// ============================================================================

#[tokio::test]
async fn test_open_task_always_assignable() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(&store, &project, User::new("1", "Ada", "Lovelace", "ada@example.com")).await;

    // No required skills at all, member has no skills either.
    let task = Task::new(&project.id, "Write minutes", "todo");
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store.clone());
    let result = engine.assign_single(&ctx(), &task_id).await.unwrap();

    assert_eq!(result.user_id, "1");
    assert_eq!(result.task_title, "Write minutes");

    let task = store.get_task(&ctx(), &task_id).await.unwrap().unwrap();
    assert_eq!(task.assignee.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_no_skill_holder_leaves_task_unassigned() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 4),
    )
    .await;

    let task = Task::new(&project.id, "Logo refresh", "todo").with_required_skills(["design"]);
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store.clone());
    let err = engine.assign_single(&ctx(), &task_id).await.unwrap_err();
    assert!(matches!(err, Error::NoEligibleUser(_)));

    let task = store.get_task(&ctx(), &task_id).await.unwrap().unwrap();
    assert!(task.assignee.is_none());
}

#[tokio::test]
async fn test_assign_single_task_not_found() {
    let store = Arc::new(MemoryStore::new());
    seed_project(&store).await;

    let engine = AssignmentEngine::new(store);
    let err = engine.assign_single(&ctx(), "ghost").await.unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(id) if id == "ghost"));
}

#[tokio::test]
async fn test_empty_membership_is_a_failure() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;

    let task = Task::new(&project.id, "Orphan", "todo");
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store);
    let err = engine.assign_single(&ctx(), &task_id).await.unwrap_err();
    assert!(matches!(err, Error::NoEligibleUser(_)));
}

#[tokio::test]
async fn test_reassignment_overwrites() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 5),
    )
    .await;

    let task = Task::new(&project.id, "Frontend fix", "todo")
        .with_required_skills(["js"])
        .with_assignee("someone-who-left");
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store.clone());
    let result = engine.assign_single(&ctx(), &task_id).await.unwrap();
    assert_eq!(result.user_id, "1");

    let task = store.get_task(&ctx(), &task_id).await.unwrap().unwrap();
    assert_eq!(task.assignee.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_tie_break_lowest_user_id_reproducible() {
    for _ in 0..5 {
        let store = Arc::new(MemoryStore::new());
        let project = seed_project(&store).await;
        // Insert in descending id order; the engine must still pick "1".
        seed_member(
            &store,
            &project,
            User::new("2", "Grace", "Hopper", "grace@example.com").with_skill("js", 3),
        )
        .await;
        seed_member(
            &store,
            &project,
            User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 3),
        )
        .await;

        let task = Task::new(&project.id, "Tied", "todo").with_required_skills(["js"]);
        let task_id = task.id.clone();
        store.insert_task(task).await;

        let engine = AssignmentEngine::new(store);
        let result = engine.assign_single(&ctx(), &task_id).await.unwrap();
        assert_eq!(result.user_id, "1");
    }
}

#[tokio::test]
async fn test_higher_coverage_beats_lower_id() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 2),
    )
    .await;
    seed_member(
        &store,
        &project,
        User::new("2", "Grace", "Hopper", "grace@example.com").with_skill("js", 5),
    )
    .await;

    let task = Task::new(&project.id, "Hard frontend", "todo").with_required_skills(["js"]);
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store);
    let result = engine.assign_single(&ctx(), &task_id).await.unwrap();
    assert_eq!(result.user_id, "2");
}

#[tokio::test]
async fn test_existing_load_counts_against_candidate() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 3),
    )
    .await;
    seed_member(
        &store,
        &project,
        User::new("2", "Grace", "Hopper", "grace@example.com").with_skill("js", 3),
    )
    .await;

    // Ada already carries two active tasks; a done task must not count.
    store
        .insert_task(Task::new(&project.id, "Busy 1", "doing").with_assignee("1"))
        .await;
    store
        .insert_task(Task::new(&project.id, "Busy 2", "todo").with_assignee("1"))
        .await;
    store
        .insert_task(Task::new(&project.id, "Shipped", "done").with_assignee("1"))
        .await;

    let task = Task::new(&project.id, "New work", "todo").with_required_skills(["js"]);
    let task_id = task.id.clone();
    store.insert_task(task).await;

    let engine = AssignmentEngine::new(store);
    let result = engine.assign_single(&ctx(), &task_id).await.unwrap();
    assert_eq!(result.user_id, "2");
}

// ============================================================================
// Bulk assignment
// ============================================================================

#[tokio::test]
async fn test_bulk_spreads_identical_tasks_across_equal_users() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 3),
    )
    .await;
    seed_member(
        &store,
        &project,
        User::new("2", "Grace", "Hopper", "grace@example.com").with_skill("js", 3),
    )
    .await;

    for task in ordered_tasks(&project, &["T1", "T2"], &["js"]) {
        store.insert_task(task).await;
    }

    let engine = AssignmentEngine::new(store.clone());
    let report = engine
        .assign_all_unassigned(&ctx(), &project.id, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.total_assigned(), 2);
    assert_eq!(report.total_errors(), 0);

    // T1 goes to the lower id on the tie; T2 sees Ada's new load and goes
    // to Grace. No pile-up on the single best-skilled user.
    assert_eq!(report.assignments[0].task_title, "T1");
    assert_eq!(report.assignments[0].user_id, "1");
    assert_eq!(report.assignments[1].task_title, "T2");
    assert_eq!(report.assignments[1].user_id, "2");
}

#[tokio::test]
async fn test_bulk_continues_past_failures() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 3),
    )
    .await;

    let mut tasks = ordered_tasks(&project, &["Unmatchable", "Fine"], &[]);
    tasks[0].required_skills = ["design".to_string()].into_iter().collect();
    for task in tasks {
        store.insert_task(task).await;
    }

    let engine = AssignmentEngine::new(store.clone());
    let report = engine
        .assign_all_unassigned(&ctx(), &project.id, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.total_errors(), 1);
    assert_eq!(report.errors[0].task_title, "Unmatchable");
    assert_eq!(report.errors[0].message, "no eligible user");

    assert_eq!(report.total_assigned(), 1);
    assert_eq!(report.assignments[0].task_title, "Fine");
}

#[tokio::test]
async fn test_bulk_skips_already_assigned_tasks() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com"),
    )
    .await;

    store
        .insert_task(Task::new(&project.id, "Taken", "todo").with_assignee("2"))
        .await;
    store.insert_task(Task::new(&project.id, "Open", "todo")).await;

    let engine = AssignmentEngine::new(store.clone());
    let report = engine
        .assign_all_unassigned(&ctx(), &project.id, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.total_assigned(), 1);
    assert_eq!(report.assignments[0].task_title, "Open");
}

#[tokio::test]
async fn test_bulk_unknown_project() {
    let store = Arc::new(MemoryStore::new());
    let engine = AssignmentEngine::new(store);

    let err = engine
        .assign_all_unassigned(&ctx(), "nope", &CancelFlag::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn test_bulk_persistence_failures_captured() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com"),
    )
    .await;
    for task in ordered_tasks(&project, &["T1", "T2"], &[]) {
        store.insert_task(task).await;
    }

    store.fail_writes(true);

    let engine = AssignmentEngine::new(store.clone());
    let report = engine
        .assign_all_unassigned(&ctx(), &project.id, &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(report.total_assigned(), 0);
    assert_eq!(report.total_errors(), 2);
    for failure in &report.errors {
        assert!(failure.message.contains("write rejected"));
    }
}

#[tokio::test]
async fn test_cancelled_run_commits_nothing_further() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com"),
    )
    .await;
    for task in ordered_tasks(&project, &["T1", "T2"], &[]) {
        store.insert_task(task).await;
    }

    let cancel = CancelFlag::new();
    cancel.cancel();

    let engine = AssignmentEngine::new(store.clone());
    let report = engine
        .assign_all_unassigned(&ctx(), &project.id, &cancel)
        .await
        .unwrap();

    assert_eq!(report.total_assigned(), 0);
    assert_eq!(report.total_errors(), 0);

    let open = store
        .get_project_tasks(&ctx(), &project.id, true)
        .await
        .unwrap();
    assert_eq!(open.len(), 2);
}

// ============================================================================
// Workload analysis
// ============================================================================

#[tokio::test]
async fn test_workload_analysis_tiers_and_skills() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store).await;
    seed_member(
        &store,
        &project,
        User::new("1", "Ada", "Lovelace", "ada@example.com").with_skill("js", 3),
    )
    .await;
    seed_member(
        &store,
        &project,
        User::new("2", "Grace", "Hopper", "grace@example.com"),
    )
    .await;

    for i in 0..5 {
        store
            .insert_task(Task::new(&project.id, format!("W{i}"), "doing").with_assignee("1"))
            .await;
    }

    let engine = AssignmentEngine::new(store);
    let entries = engine.workload_analysis(&ctx(), &project.id).await.unwrap();

    assert_eq!(entries.len(), 2);

    let ada = &entries[0];
    assert_eq!(ada.user_id, "1");
    assert_eq!(ada.task_count, 5);
    assert_eq!(ada.tier, WorkloadTier::Overloaded);
    assert_eq!(ada.skills.len(), 1);
    assert_eq!(ada.skills[0].name, "JavaScript");
    assert_eq!(ada.skills[0].level, 3);

    let grace = &entries[1];
    assert_eq!(grace.task_count, 0);
    assert_eq!(grace.tier, WorkloadTier::Free);
    assert!(grace.skills.is_empty());
}
