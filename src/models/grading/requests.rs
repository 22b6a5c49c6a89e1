use serde::Deserialize;
use ts_rs::TS;

// 小组评分请求
//
// score 保持原始 JSON 值，数字、数字字符串与 null 都接受，
// 宽容解析与界限校验在 utils::score::validate_score 统一完成。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct SaveGroupGradeRequest {
    pub score: Option<serde_json::Value>,
    pub feedback: Option<String>,
}
