pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sections::requests::CreateSectionRequest;
use crate::storage::Storage;

pub struct SectionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SectionService {
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

    // 在课程下创建教学班
    pub async fn create_section(
        &self,
        req: &HttpRequest,
        course_id: i64,
        section_data: CreateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_section(self, req, course_id, section_data).await
    }

    // 列出课程下的教学班
    pub async fn list_sections(
        &self,
        req: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_sections(self, req, course_id).await
    }
}
