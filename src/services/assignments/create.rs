use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    class_section_id: i64,
    assignment_data: CreateAssignmentRequest,
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

    // 教学班必须存在，且只有授课讲师本人（或管理员）能布置作业
    let section = match storage.get_section_by_id(class_section_id).await {
        Ok(Some(section)) => {
            if role != Some(UserRole::Admin) && section.lecturer_id != uid {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "You do not have permission to create assignments in this section",
                )));
            }
            section
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SectionNotFound,
                "Section not found",
            )));
        }
        Err(e) => {
            error!("Failed to get section {}: {}", class_section_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching section",
                )),
            );
        }
    };

    // 作业始终归属教学班的授课讲师，管理员代办时也不例外
    match storage
        .create_assignment(class_section_id, section.lecturer_id, assignment_data)
        .await
    {
        Ok(assignment) => {
            info!(
                "Assignment {} created in section {} by {}",
                assignment.title, class_section_id, uid
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => {
            error!("Assignment creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentCreationFailed,
                    "Assignment creation failed",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::sections::requests::CreateSectionRequest;
    use crate::models::users::entities::CurrentUser;
    use crate::services::assignments::check_assignment_owner;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::http::StatusCode;
    use actix_web::{HttpMessage, web};
    use std::sync::Arc;

    // 管理员代办布置作业时，作业仍归属教学班的授课讲师
    #[actix_web::test]
    async fn test_admin_created_assignment_belongs_to_section_lecturer() {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());

        let course = storage
            .create_course(CreateCourseRequest {
                code: "CS101".to_string(),
                title: "Intro".to_string(),
                credit: 3.0,
            })
            .await
            .unwrap();
        let section = storage
            .create_section(
                course.id,
                100,
                CreateSectionRequest {
                    lecturer_id: Some(100),
                    name: "CS101-A".to_string(),
                    capacity: None,
                },
            )
            .await
            .unwrap();

        // 管理员 1 发起创建
        let req = actix_web::test::TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(CurrentUser {
            id: 1,
            role: UserRole::Admin,
        });

        let service = AssignmentService::new_lazy();
        let resp = service
            .create_assignment(
                &req,
                section.id,
                serde_json::from_str::<CreateAssignmentRequest>(
                    r#"{
                        "title": "Project",
                        "content": null,
                        "components": [{"name": "Code", "weight": 100}]
                    }"#,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["lecturer_id"], 100);

        // 授课讲师本人通过所有权校验，能继续评分和切换可见性
        let assignment = storage
            .get_assignment_by_id(json["data"]["id"].as_i64().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(check_assignment_owner(&assignment, 100, Some(&UserRole::Lecturer)).is_ok());
    }
}
