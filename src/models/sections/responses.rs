use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::ClassSection;

// 课程下的教学班列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct SectionListResponse {
    pub items: Vec<ClassSection>,
}
