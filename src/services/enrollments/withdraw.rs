use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::WithdrawOutcome;

pub async fn withdraw(
    service: &EnrollmentService,
    request: &HttpRequest,
    enrollment_id: i64,
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

    match storage.withdraw_enrollment(enrollment_id, uid).await {
        Ok(WithdrawOutcome::Withdrawn(enrollment)) => {
            info!("Student {} withdrew enrollment {}", uid, enrollment_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "Withdrawn successfully")))
        }
        Ok(WithdrawOutcome::AlreadyWithdrawn) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AlreadyWithdrawn, "Enrollment already withdrawn"),
        )),
        Ok(WithdrawOutcome::NotFound) => Ok(HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::EnrollmentNotFound, "Enrollment not found"),
        )),
        Err(e) => {
            error!("Withdraw failed for enrollment {}: {}", enrollment_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::WithdrawFailed,
                    "Withdraw failed",
                )),
            )
        }
    }
}
