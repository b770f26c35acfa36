pub mod engine;
pub mod error;
pub mod report;
pub mod scorer;
pub mod store;
pub mod task;
pub mod user;
pub mod workload;

// Re-exports
pub use engine::{
    AssignmentEngine, CancelFlag, EngineOptions, SkillSummary, WorkloadAnalysisEntry,
};
pub use error::{Error, Result};
pub use report::{AssignmentFailure, AssignmentReport, AssignmentResult};
pub use scorer::{MatchScorer, ScoreOutcome};
pub use store::{ProjectStore, RequestContext};
pub use task::{Column, Priority, Project, ResolvedStatus, Task};
pub use user::{ProjectRole, Skill, SkillCatalog, User};
pub use workload::{WorkloadEntry, WorkloadIndex, WorkloadTier};
