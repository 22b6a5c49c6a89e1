use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Course;
use crate::models::PaginationInfo;

// 课程列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}
