//! 小组评分管线
//!
//! 顺序固定：所有权 -> 小组归属 -> 评分项下标 -> 分数校验 -> 解析评分项 -> 逐成员写入。
//! 任一环节失败都发生在任何写入之前（解析评分项本身幂等，可安全重试）。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::grading::requests::SaveGroupGradeRequest;
use crate::models::grading::responses::SavedGradesResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::check_assignment_owner;
use crate::storage::SaveGradesOutcome;
use crate::utils::score::validate_score;

pub async fn save_group_grade(
    service: &GradingService,
    request: &HttpRequest,
    assignment_id: i64,
    group_id: i64,
    component_index: i64,
    grade_data: SaveGroupGradeRequest,
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

    // 评分项下标指向声明列表，负数和越界一视同仁
    let spec = match usize::try_from(component_index)
        .ok()
        .and_then(|idx| assignment.component_at(idx))
    {
        Some(spec) => spec.clone(),
        None => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ComponentIndexOutOfRange,
                format!(
                    "Component index {} out of range (assignment declares {} components)",
                    component_index,
                    assignment.components.len()
                ),
            )));
        }
    };

    // 分数校验在任何写入之前
    let score = match validate_score(grade_data.score.as_ref()) {
        Ok(score) => score,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    // 解析评分项（首次使用时物化）
    let component = match storage.get_or_create_component(assignment_id, &spec).await {
        Ok(component) => component,
        Err(e) => {
            error!(
                "Failed to resolve component {} of assignment {}: {}",
                spec.name, assignment_id, e
            );
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::GradeSaveFailed,
                    "Failed to resolve grading component",
                )),
            );
        }
    };

    // 事务内逐成员写入
    match storage
        .save_group_grades(component.id, group_id, score, grade_data.feedback, uid)
        .await
    {
        Ok(SaveGradesOutcome::Saved(saved_grade_ids)) => {
            info!(
                "Lecturer {} graded group {} on component {} ({} members)",
                uid,
                group_id,
                component.name,
                saved_grade_ids.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SavedGradesResponse { saved_grade_ids },
                "Grades saved",
            )))
        }
        Ok(SaveGradesOutcome::GroupNotFoundOrEmpty) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::GroupNotFoundOrEmpty, "Group has no members"),
        )),
        Err(e) => {
            error!("Failed to save grades for group {}: {}", group_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::GradeSaveFailed,
                    "Failed to save grades",
                )),
            )
        }
    }
}
