use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{CourseQueryParams, CreateCourseRequest};
use crate::models::sections::requests::CreateSectionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{CourseService, SectionService};
use crate::utils::SafeCourseIdI64;

// 懒加载的全局 COURSE_SERVICE 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static SECTION_SERVICE: Lazy<SectionService> = Lazy::new(SectionService::new_lazy);

// HTTP处理程序
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQueryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn create_section(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    section_data: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .create_section(&req, course_id.0, section_data.into_inner())
        .await
}

pub async fn list_sections(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.list_sections(&req, course_id.0).await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 任何已认证用户可以浏览课程目录
                    .route(web::get().to(list_courses))
                    .route(
                        web::post()
                            .to(create_course)
                            // 仅管理员可以创建课程
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(web::resource("/{course_id}").route(web::get().to(get_course)))
            .service(
                web::resource("/{course_id}/sections")
                    .route(web::get().to(list_sections))
                    .route(
                        web::post()
                            .to(create_section)
                            // 讲师创建自己的教学班，管理员可以指定讲师
                            .wrap(middlewares::RequireRole::new_any(UserRole::lecturer_roles())),
                    ),
            ),
    );
}
