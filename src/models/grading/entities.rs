use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 已物化的评分项记录
//
// 声明评分项（ComponentSpec）首次被评分时落库为一条记录，
// 之后按 (assignment_id, name) 复用。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingComponent {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub weight: f64,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 成绩行：每（评分项，学生）一行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Grade {
    pub id: i64,
    pub component_id: i64,
    pub student_id: i64,
    // None 表示未评分，区别于 0 分
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
