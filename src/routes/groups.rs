use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::groups::requests::{AddGroupMemberRequest, CreateGroupRequest};
use crate::models::users::entities::UserRole;
use crate::services::GroupService;
use crate::utils::{SafeAssignmentIdI64, SafeGroupIdI64};

// 懒加载的全局 GROUP_SERVICE 实例
static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

// HTTP处理程序
pub async fn create_group(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    group_data: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .create_group(&req, assignment_id.0, group_data.into_inner())
        .await
}

pub async fn list_groups(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_groups(&req, assignment_id.0).await
}

pub async fn add_member(
    req: HttpRequest,
    path: web::Path<(SafeAssignmentIdI64, SafeGroupIdI64)>,
    member_data: web::Json<AddGroupMemberRequest>,
) -> ActixResult<HttpResponse> {
    let assignment_id = path.0.0;
    let group_id = path.1.0;
    GROUP_SERVICE
        .add_member(&req, assignment_id, group_id, member_data.into_inner())
        .await
}

// 配置路由
pub fn configure_groups_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/groups")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_groups))
                    .route(
                        web::post()
                            .to(create_group)
                            // 作业归属讲师组建小组
                            .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                    ),
            )
            .service(
                web::resource("/{group_id}/members").route(
                    web::post()
                        .to(add_member)
                        .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                ),
            ),
    );
}
