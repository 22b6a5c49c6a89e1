use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{Grade, GradingComponent};
use crate::models::groups::entities::Group;

// 小组评分写入结果
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SavedGradesResponse {
    pub saved_grade_ids: Vec<i64>,
}

// 讲师评分视图：评分项、小组（含成员）、已有成绩行与各学生暂定均分
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingViewResponse {
    pub components: Vec<GradingComponent>,
    pub groups: Vec<Group>,
    pub grades: Vec<Grade>,
    pub averages: Vec<StudentAverage>,
}

// 单个学生的加权均分；average 为 None 表示"不可计算"，区别于 0 分
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct StudentAverage {
    pub student_id: i64,
    pub average: Option<f64>,
}

// 学生成绩视图：可见性门禁之后的产物
//
// visible=false 时 data 为空且不泄露任何分数数据；
// visible=true 时 average 始终出现在负载里（可为 null）。
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct StudentGradesResponse {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StudentGradesData>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct StudentGradesData {
    pub components: Vec<GradingComponent>,
    pub grades: Vec<Grade>,
    // 不可计算时为 null，仍然序列化（0.0 是合法可显示的均分）
    pub average: Option<f64>,
}
