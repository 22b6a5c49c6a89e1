use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Enrollment;
use crate::models::PaginationInfo;

// 选课列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<Enrollment>,
    pub pagination: PaginationInfo,
}

// 选课冲突详情：携带冲突教学班与课程身份，供前端拼用户提示
// （"already enrolled in class X for course Y"）
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentConflict {
    pub conflicting_section_id: i64,
    pub conflicting_section_name: String,
    pub course_id: i64,
    pub course_title: String,
}
