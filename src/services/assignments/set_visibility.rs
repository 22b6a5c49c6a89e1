use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AssignmentService, check_assignment_owner};
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::SetGradesVisibleRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn set_grades_visible(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    visible_data: SetGradesVisibleRequest,
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

    // 所有权校验在更新之前
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

    match storage
        .set_grades_visible(assignment_id, visible_data.grades_visible)
        .await
    {
        Ok(Some(assignment)) => {
            info!(
                "Assignment {} grades_visible set to {} by {}",
                assignment_id, assignment.grades_visible, uid
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Visibility updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => {
            error!(
                "Failed to update visibility of assignment {}: {}",
                assignment_id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while updating visibility",
                )),
            )
        }
    }
}
