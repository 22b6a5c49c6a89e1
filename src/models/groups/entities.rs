use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 小组实体：同一作业下协作的一组学生，评分以小组为单位
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct Group {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub members: Vec<GroupMember>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 小组成员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupMember {
    pub id: i64,
    pub group_id: i64,
    pub student_id: i64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
