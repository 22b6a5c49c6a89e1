use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grading::requests::SaveGroupGradeRequest;
use crate::models::users::entities::UserRole;
use crate::services::GradingService;
use crate::utils::{SafeAssignmentIdI64, SafeGroupIdI64};

// 懒加载的全局 GRADING_SERVICE 实例
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

// HTTP处理程序
pub async fn save_group_grade(
    req: HttpRequest,
    path: web::Path<(SafeAssignmentIdI64, SafeGroupIdI64, i64)>,
    grade_data: web::Json<SaveGroupGradeRequest>,
) -> ActixResult<HttpResponse> {
    let assignment_id = path.0.0;
    let group_id = path.1.0;
    // 下标原样传给服务层，负数按越界处理而不是路径解析错误
    let component_index = path.2;
    GRADING_SERVICE
        .save_group_grade(
            &req,
            assignment_id,
            group_id,
            component_index,
            grade_data.into_inner(),
        )
        .await
}

pub async fn grading_view(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.grading_view(&req, assignment_id.0).await
}

pub async fn my_grades(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.my_grades(&req, assignment_id.0).await
}

// 配置路由
//
// 作用域前缀都以字面量段结尾，避免与 /api/v1/assignments 下的其它作用域互相遮蔽。
// 注册顺序要求：本函数先于 configure_groups_routes 和 configure_assignments_routes 调用。
pub fn configure_grading_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/groups/{group_id}/components")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{component_index}/grade").route(
                    web::post()
                        .to(save_group_grade)
                        // 评分写入：作业归属讲师或管理员（服务内还有所有权校验）
                        .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                ),
            ),
    );
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/grading")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(grading_view)
                        .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                ),
            ),
    );
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/my-grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(my_grades)
                        // 学生查看自己的成绩
                        .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                ),
            ),
    );
}
