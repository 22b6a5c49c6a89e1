use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{EnrollRequest, EnrollmentQueryParams};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeEnrollmentIdI64;

// 懒加载的全局 ENROLLMENT_SERVICE 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

// HTTP处理程序
pub async fn enroll(
    req: HttpRequest,
    enroll_data: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .enroll(&req, enroll_data.into_inner())
        .await
}

pub async fn list_my_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentQueryParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_my_enrollments(&req, query.into_inner())
        .await
}

pub async fn withdraw(
    req: HttpRequest,
    enrollment_id: SafeEnrollmentIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.withdraw(&req, enrollment_id.0).await
}

// 配置路由
pub fn configure_enrollments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::post()
                            .to(enroll)
                            // 学生本人选课
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    )
                    .route(
                        web::get()
                            .to(list_my_enrollments)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            )
            .service(
                web::resource("/{enrollment_id}").route(
                    web::delete()
                        .to(withdraw)
                        // 学生退自己的课
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            ),
    );
}
