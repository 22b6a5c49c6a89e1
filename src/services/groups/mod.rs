pub mod add_member;
pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::groups::requests::{AddGroupMemberRequest, CreateGroupRequest};
use crate::storage::Storage;

pub struct GroupService {
    storage: Option<Arc<dyn Storage>>,
}

impl GroupService {
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

    // 在作业下创建小组
    pub async fn create_group(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
        group_data: CreateGroupRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_group(self, req, assignment_id, group_data).await
    }

    // 添加小组成员
    pub async fn add_member(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
        group_id: i64,
        member_data: AddGroupMemberRequest,
    ) -> ActixResult<HttpResponse> {
        add_member::add_member(self, req, assignment_id, group_id, member_data).await
    }

    // 列出作业下的小组（含成员）
    pub async fn list_groups(
        &self,
        req: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_groups(self, req, assignment_id).await
    }
}
