use crate::{SkillCatalog, Task, User, WorkloadIndex};
use serde::{Deserialize, Serialize};

/// Outcome of scoring one candidate for one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoreOutcome {
    Eligible(f64),
    Ineligible,
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Eligible(s) => Some(*s),
            ScoreOutcome::Ineligible => None,
        }
    }
}

/// Scores a candidate user against a task: skill coverage minus a load
/// penalty. Pure given its inputs, so repeated scoring within a run is
/// reproducible.
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer {
    pub penalty_weight: f64,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self { penalty_weight: 1.0 }
    }
}

impl MatchScorer {
    pub fn new(penalty_weight: f64) -> Self {
        Self { penalty_weight }
    }

    /// Coverage subtotal = sum of the user's proficiency over required
    /// skills they hold. A task with known required skills that the user
    /// matches none of is a hard `Ineligible`; a task with no (known)
    /// required skills is open to anyone. Skill ids missing from the
    /// catalog are dropped from the requirement set with a warning.
    pub fn score(
        &self,
        task: &Task,
        user: &User,
        workload: &WorkloadIndex,
        catalog: &SkillCatalog,
    ) -> ScoreOutcome {
        let mut coverage = 0.0_f64;
        let mut known_requirements = 0u32;
        let mut matched = 0u32;

        for skill_id in &task.required_skills {
            if !catalog.contains(skill_id) {
                tracing::warn!(
                    task_id = %task.id,
                    skill_id = %skill_id,
                    "task requires unknown skill, ignoring for scoring"
                );
                continue;
            }
            known_requirements += 1;
            if let Some(level) = user.proficiency(skill_id) {
                coverage += f64::from(level);
                matched += 1;
            }
        }

        if known_requirements > 0 && matched == 0 {
            return ScoreOutcome::Ineligible;
        }

        let penalty = f64::from(workload.count_of(&user.id)) * self.penalty_weight;
        ScoreOutcome::Eligible(coverage - penalty)
    }
}
