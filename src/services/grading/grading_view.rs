//! 讲师评分视图
//!
//! 暂定均分与学生端公布均分走同一个计算入口 (utils::score::average_for_student)，
//! 可见性开关不影响讲师端。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::grading::responses::{GradingViewResponse, StudentAverage};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::check_assignment_owner;
use crate::utils::score::average_for_student;

pub async fn grading_view(
    service: &GradingService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let role = RequireJWT::extract_user_role(request);

    let uid = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            error!("Failed to get assignment {}: {}", assignment_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching assignment",
                )),
            );
        }
    };

    if let Err(resp) = check_assignment_owner(&assignment, uid, role.as_ref()) {
        return Ok(resp);
    }

    let components = match storage.list_components_by_assignment(assignment_id).await {
        Ok(components) => components,
        Err(e) => {
            error!(
                "Failed to list components of assignment {}: {}",
                assignment_id, e
            );
            return Ok(internal_error());
        }
    };

    let groups = match storage.list_groups_by_assignment(assignment_id).await {
        Ok(groups) => groups,
        Err(e) => {
            error!(
                "Failed to list groups of assignment {}: {}",
                assignment_id, e
            );
            return Ok(internal_error());
        }
    };

    let grades = match storage.list_grades_by_assignment(assignment_id).await {
        Ok(grades) => grades,
        Err(e) => {
            error!(
                "Failed to list grades of assignment {}: {}",
                assignment_id, e
            );
            return Ok(internal_error());
        }
    };

    // 所有出现在小组里的学生各算一个暂定均分
    let mut student_ids: Vec<i64> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.student_id))
        .collect();
    student_ids.sort_unstable();
    student_ids.dedup();

    let averages: Vec<StudentAverage> = student_ids
        .into_iter()
        .map(|student_id| StudentAverage {
            student_id,
            average: average_for_student(&components, &grades, student_id),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradingViewResponse {
            components,
            groups,
            grades,
            averages,
        },
        "Grading view retrieved",
    )))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Internal server error while building grading view",
    ))
}
