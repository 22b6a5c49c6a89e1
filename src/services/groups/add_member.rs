use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::GroupService;
use crate::middlewares::RequireJWT;
use crate::models::groups::requests::AddGroupMemberRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::check_assignment_owner;
use crate::storage::AddMemberOutcome;

pub async fn add_member(
    service: &GroupService,
    request: &HttpRequest,
    assignment_id: i64,
    group_id: i64,
    member_data: AddGroupMemberRequest,
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

    // 小组必须属于这个作业
    match storage.get_group_with_members(group_id).await {
        Ok(Some(group)) if group.assignment_id == assignment_id => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GroupNotFoundOrEmpty,
                "Group not found in this assignment",
            )));
        }
        Err(e) => {
            error!("Failed to get group {}: {}", group_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching group",
                )),
            );
        }
    }

    match storage
        .add_group_member(group_id, member_data.student_id)
        .await
    {
        Ok(AddMemberOutcome::Added(member)) => {
            info!(
                "Student {} added to group {} by {}",
                member.student_id, group_id, uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(member, "Member added")))
        }
        Ok(AddMemberOutcome::Duplicate) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::GroupMemberAlreadyExists,
                "Student is already a member of this group",
            ),
        )),
        Ok(AddMemberOutcome::GroupNotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::GroupNotFoundOrEmpty, "Group not found"),
        )),
        Err(e) => {
            error!("Failed to add member to group {}: {}", group_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while adding member",
                )),
            )
        }
    }
}
