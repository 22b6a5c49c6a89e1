use serde::Deserialize;
use ts_rs::TS;

use super::entities::ComponentSpec;

// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

// 设置成绩可见性请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SetGradesVisibleRequest {
    pub grades_visible: bool,
}
