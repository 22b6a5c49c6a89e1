pub mod create;
pub mod get;
pub mod set_visibility;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{CreateAssignmentRequest, SetGradesVisibleRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 在教学班下创建作业
    pub async fn create_assignment(
        &self,
        req: &HttpRequest,
        class_section_id: i64,
        assignment_data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, req, class_section_id, assignment_data).await
    }

    // 获取作业详情
    pub async fn get_assignment(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, req, assignment_id).await
    }

    // 列出教学班下的作业
    pub async fn list_assignments(
        &self,
        req: &HttpRequest,
        class_section_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::list_assignments(self, req, class_section_id).await
    }

    // 设置作业成绩可见性
    pub async fn set_grades_visible(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
        visible_data: SetGradesVisibleRequest,
    ) -> ActixResult<HttpResponse> {
        set_visibility::set_grades_visible(self, req, assignment_id, visible_data).await
    }
}

/// 作业所有权校验：归属讲师本人或管理员
///
/// 评分写入、可见性切换等讲师端操作共用的门禁。
pub(crate) fn check_assignment_owner(
    assignment: &Assignment,
    uid: i64,
    role: Option<&UserRole>,
) -> Result<(), HttpResponse> {
    if role == Some(&UserRole::Admin) || assignment.lecturer_id == uid {
        return Ok(());
    }
    Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::NotAssignmentOwner,
        "You are not the owner of this assignment",
    )))
}
