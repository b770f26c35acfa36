use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::handlers::{assign::map_error, request_context, ErrorResponse};
use crate::state::ApiState;
use taskforce_core::{WorkloadAnalysisEntry, WorkloadTier};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadQuery {
    pub project_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadAnalysisResponse {
    pub workload_data: Vec<WorkloadEntryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntryDto {
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub task_count: u32,
    pub tier: WorkloadTier,
    pub skills: Vec<SkillDto>,
}

#[derive(Debug, Serialize)]
pub struct SkillDto {
    pub id: String,
    pub name: String,
    pub level: u8,
}

/// Current load and skills per project member, for the workload view.
pub async fn workload_analysis(
    State(state): State<ApiState>,
    Query(query): Query<WorkloadQuery>,
    headers: HeaderMap,
) -> Result<Json<WorkloadAnalysisResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = request_context(&headers);

    match state.engine.workload_analysis(&ctx, &query.project_id).await {
        Ok(entries) => Ok(Json(WorkloadAnalysisResponse {
            workload_data: entries.into_iter().map(entry_to_dto).collect(),
        })),
        Err(e) => Err(map_error(e)),
    }
}

fn entry_to_dto(entry: WorkloadAnalysisEntry) -> WorkloadEntryDto {
    WorkloadEntryDto {
        user_id: entry.user_id,
        firstname: entry.firstname,
        lastname: entry.lastname,
        email: entry.email,
        task_count: entry.task_count,
        tier: entry.tier,
        skills: entry
            .skills
            .into_iter()
            .map(|s| SkillDto {
                id: s.id,
                name: s.name,
                level: s.level,
            })
            .collect(),
    }
}
