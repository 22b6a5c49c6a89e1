use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::enrollments::requests::EnrollmentQueryParams;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_my_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    query: EnrollmentQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let uid = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    match storage.list_student_enrollments(uid, query).await {
        Ok(response) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Enrollments retrieved")))
        }
        Err(e) => {
            error!("Failed to list enrollments of student {}: {}", uid, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing enrollments",
                )),
            )
        }
    }
}

pub async fn list_section_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    class_section_id: i64,
    query: EnrollmentQueryParams,
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

    // 教学班存在性 + 名册访问权：授课讲师本人或管理员
    match storage.get_section_by_id(class_section_id).await {
        Ok(Some(section)) => {
            if role != Some(UserRole::Admin) && section.lecturer_id != uid {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "You do not have permission to view this section roster",
                )));
            }
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SectionNotFound,
                "Section not found",
            )));
        }
        Err(e) => {
            error!("Failed to get section {}: {}", class_section_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching section",
                )),
            );
        }
    }

    match storage
        .list_section_enrollments(class_section_id, query)
        .await
    {
        Ok(response) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Enrollments retrieved")))
        }
        Err(e) => {
            error!(
                "Failed to list enrollments of section {}: {}",
                class_section_id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing enrollments",
                )),
            )
        }
    }
}
