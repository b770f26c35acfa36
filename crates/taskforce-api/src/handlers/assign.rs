use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::handlers::{request_context, ErrorResponse};
use crate::state::ApiState;
use taskforce_core::{AssignmentReport, AssignmentResult, CancelFlag, Error};

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignedTo {
    pub firstname: String,
    pub lastname: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentEntry {
    pub task_title: String,
    pub assigned_to: AssignedTo,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentError {
    pub task_title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignAllResponse {
    pub total_assigned: usize,
    pub total_errors: usize,
    pub assignments: Vec<AssignmentEntry>,
    pub errors: Vec<AssignmentError>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignResponse {
    pub task_id: String,
    pub task_title: String,
    pub assigned_to: AssignedTo,
}

/// Assign every unassigned task in a project. Always 200 with a report
/// when the project exists, even if every task failed; the report's error
/// list carries the per-task outcomes.
pub async fn auto_assign_all(
    State(state): State<ApiState>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AutoAssignAllResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = request_context(&headers);

    match state
        .engine
        .assign_all_unassigned(&ctx, &project_id, &CancelFlag::new())
        .await
    {
        Ok(report) => Ok(Json(report_to_response(report))),
        Err(e) => Err(map_error(e)),
    }
}

/// Assign a single task to the best-fitting member.
pub async fn auto_assign_single(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AutoAssignResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ctx = request_context(&headers);

    match state.engine.assign_single(&ctx, &task_id).await {
        Ok(result) => Ok(Json(result_to_response(result))),
        Err(e) => Err(map_error(e)),
    }
}

fn report_to_response(report: AssignmentReport) -> AutoAssignAllResponse {
    AutoAssignAllResponse {
        total_assigned: report.total_assigned(),
        total_errors: report.total_errors(),
        assignments: report
            .assignments
            .into_iter()
            .map(|a| AssignmentEntry {
                task_title: a.task_title,
                assigned_to: AssignedTo {
                    firstname: a.firstname,
                    lastname: a.lastname,
                },
            })
            .collect(),
        errors: report
            .errors
            .into_iter()
            .map(|f| AssignmentError {
                task_title: f.task_title,
                message: f.message,
            })
            .collect(),
    }
}

fn result_to_response(result: AssignmentResult) -> AutoAssignResponse {
    AutoAssignResponse {
        task_id: result.task_id,
        task_title: result.task_title,
        assigned_to: AssignedTo {
            firstname: result.firstname,
            lastname: result.lastname,
        },
    }
}

pub fn map_error(e: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        Error::TaskNotFound(_)
        | Error::ProjectNotFound(_)
        | Error::UserNotFound(_)
        | Error::SkillNotFound(_) => StatusCode::NOT_FOUND,
        Error::NoEligibleUser(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::AlreadyAssigned(_) | Error::Cancelled => StatusCode::CONFLICT,
        Error::Persistence(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
