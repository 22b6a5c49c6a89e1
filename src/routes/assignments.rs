use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::SetGradesVisibleRequest;
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::SafeAssignmentIdI64;

// 懒加载的全局 ASSIGNMENT_SERVICE 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// HTTP处理程序
pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, assignment_id.0).await
}

pub async fn set_grades_visible(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    visible_data: web::Json<SetGradesVisibleRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .set_grades_visible(&req, assignment_id.0, visible_data.into_inner())
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{assignment_id}").route(web::get().to(get_assignment)))
            .service(
                web::resource("/{assignment_id}/grades-visible").route(
                    web::put()
                        .to(set_grades_visible)
                        // 成绩公布开关：作业归属讲师或管理员（服务内还有所有权校验）
                        .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                ),
            ),
    );
}
