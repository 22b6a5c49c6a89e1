use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::enrollments::requests::EnrollmentQueryParams;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, EnrollmentService};
use crate::utils::SafeSectionIdI64;

// 懒加载的全局服务实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// HTTP处理程序
pub async fn list_section_enrollments(
    req: HttpRequest,
    section_id: SafeSectionIdI64,
    query: web::Query<EnrollmentQueryParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_section_enrollments(&req, section_id.0, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    section_id: SafeSectionIdI64,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, section_id.0, assignment_data.into_inner())
        .await
}

pub async fn list_assignments(
    req: HttpRequest,
    section_id: SafeSectionIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req, section_id.0).await
}

// 配置路由
pub fn configure_sections_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{section_id}/enrollments").route(
                    web::get()
                        .to(list_section_enrollments)
                        // 教学班名册：授课讲师或管理员
                        .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                ),
            )
            .service(
                web::resource("/{section_id}/assignments")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            // 授课讲师布置作业
                            .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                    ),
            ),
    );
}
