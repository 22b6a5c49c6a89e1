pub mod grading_view;
pub mod save_group_grade;
pub mod student_grades;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grading::requests::SaveGroupGradeRequest;
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradingService {
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

    // 按声明评分项下标给小组评分
    pub async fn save_group_grade(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
        group_id: i64,
        component_index: i64,
        grade_data: SaveGroupGradeRequest,
    ) -> ActixResult<HttpResponse> {
        save_group_grade::save_group_grade(
            self,
            req,
            assignment_id,
            group_id,
            component_index,
            grade_data,
        )
        .await
    }

    // 讲师评分视图（含暂定均分）
    pub async fn grading_view(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        grading_view::grading_view(self, req, assignment_id).await
    }

    // 学生查看自己的成绩（经过可见性门禁）
    pub async fn my_grades(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        student_grades::my_grades(self, req, assignment_id).await
    }
}
