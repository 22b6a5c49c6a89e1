use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GroupService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_groups(
    service: &GroupService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 作业必须存在
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
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
    }

    match storage.list_groups_by_assignment(assignment_id).await {
        Ok(groups) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(groups, "Groups retrieved")))
        }
        Err(e) => {
            error!(
                "Failed to list groups of assignment {}: {}",
                assignment_id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing groups",
                )),
            )
        }
    }
}
