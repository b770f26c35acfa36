use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;
mod routes;
mod state;

use taskforce_core::{
    AssignmentEngine, Column, EngineOptions, Priority, Project, ProjectStore, Skill, Task, User,
};
use taskforce_store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskforce_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Get configuration
    let port = env::var("API_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let count_done_tasks = env::var("COUNT_DONE_TASKS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let penalty_weight = env::var("LOAD_PENALTY_WEIGHT")
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(1.0);

    // Initialize store and engine
    let store = Arc::new(MemoryStore::new());

    if env::var("SEED_DEMO_DATA").is_ok() {
        seed_demo_data(&store).await;
    }

    let engine = AssignmentEngine::with_options(
        store.clone() as Arc<dyn ProjectStore>,
        EngineOptions {
            count_done_tasks,
            penalty_weight,
        },
    );

    // Create app state
    let state = state::ApiState { engine, store };

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("TaskForce API server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Small fixture project so the endpoints can be exercised without an
/// upstream persistence service.
async fn seed_demo_data(store: &MemoryStore) {
    let project = Project::new(
        "Website Redesign",
        vec![
            Column::new("todo", "To Do"),
            Column::new("doing", "In Progress"),
            Column::new("done", "Done").done(),
        ],
    );
    let project_id = project.id.clone();
    store.insert_project(project).await;

    for skill in [
        Skill::new("js", "JavaScript", "frontend"),
        Skill::new("rust", "Rust", "backend"),
        Skill::new("design", "Design", "creative"),
    ] {
        store.insert_skill(skill).await;
    }

    let users = [
        User::new("1", "Ada", "Lovelace", "ada@example.com")
            .with_skill("js", 3)
            .with_skill("rust", 5),
        User::new("2", "Grace", "Hopper", "grace@example.com")
            .with_skill("js", 4)
            .with_skill("design", 2),
    ];
    for user in users {
        store.add_member(&project_id, &user.id).await;
        store.insert_user(user).await;
    }

    let tasks = [
        Task::new(&project_id, "Rework login form", "todo").with_required_skills(["js"]),
        Task::new(&project_id, "New service endpoint", "todo")
            .with_required_skills(["rust"])
            .with_priority(Priority::High),
        Task::new(&project_id, "Landing page mockup", "todo").with_required_skills(["design"]),
    ];
    for task in tasks {
        store.insert_task(task).await;
    }

    tracing::info!(project_id = %project_id, "seeded demo project");
}
