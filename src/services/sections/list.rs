use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::SectionService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_sections(
    service: &SectionService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

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

    match storage.list_sections_by_course(course_id).await {
        Ok(response) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Sections retrieved")))
        }
        Err(e) => {
            error!("Failed to list sections of course {}: {}", course_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing sections",
                )),
            )
        }
    }
}
