use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("No eligible user for task: {0}")]
    NoEligibleUser(String),

    #[error("Task already assigned: {0}")]
    AlreadyAssigned(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
