use serde::Deserialize;
use ts_rs::TS;

// 创建教学班请求
//
// # lecturer_id 字段说明
// - **讲师创建**：可选字段，不填写则自动使用当前登录讲师的 ID
// - **管理员创建**：必填字段，用于指定授课讲师
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct CreateSectionRequest {
    pub lecturer_id: Option<i64>,
    pub name: String,
    pub capacity: Option<i32>,
}
