use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::GroupService;
use crate::middlewares::RequireJWT;
use crate::models::groups::requests::CreateGroupRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::check_assignment_owner;

pub async fn create_group(
    service: &GroupService,
    request: &HttpRequest,
    assignment_id: i64,
    group_data: CreateGroupRequest,
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

    match storage.create_group(assignment_id, group_data).await {
        Ok(group) => {
            info!(
                "Group {} created in assignment {} by {}",
                group.name, assignment_id, uid
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(group, "Group created successfully")))
        }
        Err(e) => {
            error!("Group creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::GroupCreationFailed,
                    "Group creation failed",
                )),
            )
        }
    }
}
