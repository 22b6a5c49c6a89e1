pub mod enroll;
pub mod list;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{EnrollRequest, EnrollmentQueryParams};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
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

    // 学生选课
    pub async fn enroll(
        &self,
        req: &HttpRequest,
        enroll_data: EnrollRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll(self, req, enroll_data).await
    }

    // 学生退课
    pub async fn withdraw(
        &self,
        req: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        withdraw::withdraw(self, req, enrollment_id).await
    }

    // 列出当前学生的选课记录
    pub async fn list_my_enrollments(
        &self,
        req: &HttpRequest,
        query: EnrollmentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_my_enrollments(self, req, query).await
    }

    // 列出教学班的选课记录（讲师/管理员）
    pub async fn list_section_enrollments(
        &self,
        req: &HttpRequest,
        class_section_id: i64,
        query: EnrollmentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_section_enrollments(self, req, class_section_id, query).await
    }
}
