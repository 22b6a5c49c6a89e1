//! 学生成绩视图
//!
//! 可见性门禁：grades_visible 为 false 时不返回任何分数数据，
//! 响应形状 (visible/message) 也不泄露是否已有成绩。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::grading::responses::{StudentGradesData, StudentGradesResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::score::average_for_student;

pub async fn my_grades(
    service: &GradingService,
    request: &HttpRequest,
    assignment_id: i64,
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

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            error!("Failed to get assignment {}: {}", assignment_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching assignment",
                )),
            );
        }
    };

    // 只有该教学班的在读学生能查询
    match storage
        .has_active_enrollment(uid, assignment.class_section_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this section",
            )));
        }
        Err(e) => {
            error!("Failed to check enrollment of student {}: {}", uid, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while checking enrollment",
                )),
            );
        }
    }

    // 可见性门禁：未公布时不携带任何分数数据
    if !assignment.grades_visible {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentGradesResponse {
                visible: false,
                message: Some("Grades are not yet published".to_string()),
                data: None,
            },
            "Grades not yet published",
        )));
    }

    let components = match storage.list_components_by_assignment(assignment_id).await {
        Ok(components) => components,
        Err(e) => {
            error!(
                "Failed to list components of assignment {}: {}",
                assignment_id, e
            );
            return Ok(internal_error());
        }
    };

    let grades = match storage
        .list_student_grades_for_assignment(assignment_id, uid)
        .await
    {
        Ok(grades) => grades,
        Err(e) => {
            error!(
                "Failed to list grades of student {} in assignment {}: {}",
                uid, assignment_id, e
            );
            return Ok(internal_error());
        }
    };

    // 与讲师端同一计算入口；None 表示不可计算，仍然出现在负载里
    let average = average_for_student(&components, &grades, uid);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentGradesResponse {
            visible: true,
            message: None,
            data: Some(StudentGradesData {
                components,
                grades,
                average,
            }),
        },
        "Grades retrieved",
    )))
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Internal server error while building grades view",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::ComponentSpec;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::groups::requests::CreateGroupRequest;
    use crate::models::sections::requests::CreateSectionRequest;
    use crate::models::users::entities::{CurrentUser, UserRole};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::{AddMemberOutcome, EnrollOutcome, Storage};
    use actix_web::http::StatusCode;
    use actix_web::{HttpMessage, web};
    use std::sync::Arc;

    struct Fixture {
        storage: Arc<dyn Storage>,
        section_id: i64,
        assignment_id: i64,
        group_id: i64,
    }

    // 课程 -> 教学班（讲师 100）-> 单评分项作业 -> 学生 7 的单人小组
    async fn setup() -> Fixture {
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
                    lecturer_id: None,
                    name: "CS101-A".to_string(),
                    capacity: None,
                },
            )
            .await
            .unwrap();

        let assignment = storage
            .create_assignment(
                section.id,
                100,
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

        let group = storage
            .create_group(
                assignment.id,
                CreateGroupRequest {
                    name: "Team 1".to_string(),
                },
            )
            .await
            .unwrap();
        let outcome = storage.add_group_member(group.id, 7).await.unwrap();
        assert!(matches!(outcome, AddMemberOutcome::Added(_)));

        Fixture {
            storage,
            section_id: section.id,
            assignment_id: assignment.id,
            group_id: group.id,
        }
    }

    // 构造带存储和操作主体的请求，模拟 RequireJWT 验签后的状态
    fn request_as(storage: &Arc<dyn Storage>, uid: i64, role: UserRole) -> HttpRequest {
        let req = actix_web::test::TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(CurrentUser { id: uid, role });
        req
    }

    async fn enroll(fixture: &Fixture, student_id: i64) {
        let outcome = fixture
            .storage
            .enroll_student(student_id, fixture.section_id)
            .await
            .unwrap();
        assert!(matches!(outcome, EnrollOutcome::Enrolled(_)));
    }

    async fn grade_group(fixture: &Fixture, score: Option<f64>) {
        let component = fixture
            .storage
            .get_or_create_component(
                fixture.assignment_id,
                &ComponentSpec {
                    name: "Code".to_string(),
                    weight: 100.0,
                    description: None,
                },
            )
            .await
            .unwrap();
        fixture
            .storage
            .save_group_grades(component.id, fixture.group_id, score, None, 100)
            .await
            .unwrap();
    }

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_not_enrolled_denied_even_when_grades_visible() {
        let fixture = setup().await;
        grade_group(&fixture, Some(88.0)).await;
        fixture
            .storage
            .set_grades_visible(fixture.assignment_id, true)
            .await
            .unwrap();

        // 学生 42 未选课，公布与否都不放行
        let req = request_as(&fixture.storage, 42, UserRole::Student);
        let service = GradingService::new_lazy();
        let resp = service.my_grades(&req, fixture.assignment_id).await.unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::NotEnrolled as i32);
        assert!(json.get("data").is_none());
    }

    #[actix_web::test]
    async fn test_hidden_grades_return_visible_false_without_scores() {
        let fixture = setup().await;
        enroll(&fixture, 7).await;
        // 成绩行已经存在，但未公布
        grade_group(&fixture, Some(88.0)).await;

        let req = request_as(&fixture.storage, 7, UserRole::Student);
        let service = GradingService::new_lazy();
        let resp = service.my_grades(&req, fixture.assignment_id).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["visible"], false);
        assert!(json["data"]["message"].is_string());
        // 任何分数数据都不出现在负载里
        assert!(json["data"].get("data").is_none());
    }

    #[actix_web::test]
    async fn test_visible_grades_include_average() {
        let fixture = setup().await;
        enroll(&fixture, 7).await;
        grade_group(&fixture, Some(80.0)).await;
        fixture
            .storage
            .set_grades_visible(fixture.assignment_id, true)
            .await
            .unwrap();

        let req = request_as(&fixture.storage, 7, UserRole::Student);
        let service = GradingService::new_lazy();
        let resp = service.my_grades(&req, fixture.assignment_id).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["visible"], true);
        assert_eq!(json["data"]["data"]["average"], 80.0);
        assert_eq!(json["data"]["data"]["grades"][0]["score"], 80.0);
    }

    #[actix_web::test]
    async fn test_visible_without_grades_serializes_null_average() {
        let fixture = setup().await;
        enroll(&fixture, 7).await;
        fixture
            .storage
            .set_grades_visible(fixture.assignment_id, true)
            .await
            .unwrap();

        let req = request_as(&fixture.storage, 7, UserRole::Student);
        let service = GradingService::new_lazy();
        let resp = service.my_grades(&req, fixture.assignment_id).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["visible"], true);
        // "不可计算"仍出现在负载里，值为 null
        let data = json["data"]["data"].as_object().unwrap();
        assert!(data.contains_key("average"));
        assert!(data["average"].is_null());
    }

    #[actix_web::test]
    async fn test_zero_average_is_a_value_not_absent() {
        let fixture = setup().await;
        enroll(&fixture, 7).await;
        grade_group(&fixture, Some(0.0)).await;
        fixture
            .storage
            .set_grades_visible(fixture.assignment_id, true)
            .await
            .unwrap();

        let req = request_as(&fixture.storage, 7, UserRole::Student);
        let service = GradingService::new_lazy();
        let resp = service.my_grades(&req, fixture.assignment_id).await.unwrap();

        let json = body_json(resp).await;
        assert_eq!(json["data"]["data"]["average"], 0.0);
    }
}
