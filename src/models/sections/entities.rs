use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教学班实体：一门课程的一个授课实例
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct ClassSection {
    pub id: i64,
    // 所属课程 ID
    pub course_id: i64,
    // 授课讲师 ID
    pub lecturer_id: i64,
    // 教学班名称，如 "CS101-A"
    pub name: String,
    // 容量上限，None 表示不限
    pub capacity: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
