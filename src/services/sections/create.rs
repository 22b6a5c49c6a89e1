use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SectionService;
use crate::middlewares::RequireJWT;
use crate::models::sections::requests::CreateSectionRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_section(
    service: &SectionService,
    request: &HttpRequest,
    course_id: i64,
    section_data: CreateSectionRequest,
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

    // 解析授课讲师：讲师默认自己，管理员必须显式指定
    let lecturer_id = match resolve_lecturer(role, uid, &section_data) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    // 课程必须存在
    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            error!("Failed to get course {}: {}", course_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching course",
                )),
            );
        }
    }

    match storage
        .create_section(course_id, lecturer_id, section_data)
        .await
    {
        Ok(section) => {
            info!(
                "Section {} created in course {} by {}",
                section.name, course_id, uid
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(section, "Section created successfully")))
        }
        Err(e) => {
            error!("Section creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::SectionCreationFailed,
                    "Section creation failed",
                )),
            )
        }
    }
}

fn resolve_lecturer(
    role: Option<UserRole>,
    uid: i64,
    section_data: &CreateSectionRequest,
) -> Result<i64, HttpResponse> {
    match role {
        Some(UserRole::Admin) => section_data.lecturer_id.ok_or_else(|| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "lecturer_id is required when creating a section as admin",
            ))
        }),
        Some(UserRole::Lecturer) => {
            if let Some(lecturer_id) = section_data.lecturer_id
                && lecturer_id != uid
            {
                return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "You do not have permission to create a section for another lecturer",
                )));
            }
            Ok(uid)
        }
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to create a section",
        ))),
    }
}
