use serde::Deserialize;
use ts_rs::TS;

// 创建小组请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupRequest {
    pub name: String,
}

// 添加小组成员请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct AddGroupMemberRequest {
    pub student_id: i64,
}
