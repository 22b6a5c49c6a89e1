use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::EnrollmentService;
use crate::errors::GradebookError;
use crate::middlewares::RequireJWT;
use crate::models::enrollments::requests::EnrollRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::EnrollOutcome;

pub async fn enroll(
    service: &EnrollmentService,
    request: &HttpRequest,
    enroll_data: EnrollRequest,
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

    match storage.enroll_student(uid, enroll_data.class_section_id).await {
        Ok(EnrollOutcome::Enrolled(enrollment)) => {
            info!(
                "Student {} enrolled in section {}",
                uid, enrollment.class_section_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Enrolled successfully")))
        }
        Ok(EnrollOutcome::SectionFull) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ClassFull, "Section is full"),
        )),
        // 带冲突详情的拒绝：指明已有选课的教学班与课程
        Ok(EnrollOutcome::DuplicateCourse(conflict)) => {
            let message = format!(
                "Already enrolled in section {} for course {}",
                conflict.conflicting_section_name, conflict.course_title
            );
            Ok(HttpResponse::Conflict().json(ApiResponse::error(
                ErrorCode::DuplicateCourseEnrollment,
                conflict,
                message,
            )))
        }
        Err(GradebookError::NotFound(_)) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::SectionNotFound, "Section not found"),
        )),
        Err(e) => {
            error!("Enrollment failed for student {}: {}", uid, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EnrollFailed,
                    "Enrollment failed",
                )),
            )
        }
    }
}
