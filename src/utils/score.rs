//! 分数校验与加权均分计算
//!
//! 这是评分管线的纯函数核心：校验在任何写入之前完成；
//! 均分计算只有这一份实现，讲师端暂定均分和学生端公布均分都调用它，
//! 保证两侧口径一致。

use crate::models::ErrorCode;
use crate::models::grading::entities::{Grade, GradingComponent};

/// 分数校验失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    NotANumber,
    BelowMinimum,
    AboveMaximum,
}

impl ScoreError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ScoreError::NotANumber => ErrorCode::ScoreNotANumber,
            ScoreError::BelowMinimum => ErrorCode::ScoreBelowMinimum,
            ScoreError::AboveMaximum => ErrorCode::ScoreAboveMaximum,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreError::NotANumber => "Score must be a number",
            ScoreError::BelowMinimum => "Score must not be less than 0",
            ScoreError::AboveMaximum => "Score must not be greater than 100",
        }
    }
}

/// 校验提交的原始分数
///
/// - `None` / JSON null 合法，表示"未评分"，不产生存储值
/// - 数字或可解析为数字的字符串按数值处理（宽容解析）
/// - 其余输入为 `NotANumber`；越界为 `BelowMinimum` / `AboveMaximum`
/// - 边界值 0 和 100 合法
pub fn validate_score(raw: Option<&serde_json::Value>) -> Result<Option<f64>, ScoreError> {
    let value = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let score = match value {
        serde_json::Value::Number(n) => n.as_f64().ok_or(ScoreError::NotANumber)?,
        serde_json::Value::String(s) => {
            s.trim().parse::<f64>().map_err(|_| ScoreError::NotANumber)?
        }
        _ => return Err(ScoreError::NotANumber),
    };

    if score.is_nan() {
        return Err(ScoreError::NotANumber);
    }
    if score < 0.0 {
        return Err(ScoreError::BelowMinimum);
    }
    if score > 100.0 {
        return Err(ScoreError::AboveMaximum);
    }

    Ok(Some(score))
}

/// 参与均分计算的一项：评分项权重 + 该学生在此项上的分数（可能未评）
#[derive(Debug, Clone, Copy)]
pub struct WeightedEntry {
    pub weight: f64,
    pub score: Option<f64>,
}

/// 计算加权均分
///
/// 只统计"有分数且权重为正"的评分项，权重在这些项上重新归一化：
/// `avg = (Σ score_i * weight_i/100) / (Σ weight_i) * 100`。
/// 部分评分的作业只按已评项计算，不因未评项扣分。
/// 没有任何可统计项时返回 `None`（"不可计算"，区别于 0 分）。
/// 结果四舍五入到一位小数。
pub fn compute_weighted_average(entries: &[WeightedEntry]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for entry in entries {
        // 权重缺失或非正的评分项既不进分子也不进分母
        if !(entry.weight > 0.0) || !entry.weight.is_finite() {
            continue;
        }
        let Some(score) = entry.score else {
            continue;
        };
        if !score.is_finite() {
            continue;
        }
        weighted_sum += score * entry.weight / 100.0;
        weight_total += entry.weight;
    }

    if weight_total <= 0.0 {
        return None;
    }

    let average = weighted_sum / weight_total * 100.0;
    Some((average * 10.0).round() / 10.0)
}

/// 按学生汇总：把该生的成绩行按评分项对齐后交给 `compute_weighted_average`
///
/// 讲师视图和学生视图共用的唯一入口。
pub fn average_for_student(
    components: &[GradingComponent],
    grades: &[Grade],
    student_id: i64,
) -> Option<f64> {
    let entries: Vec<WeightedEntry> = components
        .iter()
        .map(|component| WeightedEntry {
            weight: component.weight,
            score: grades
                .iter()
                .find(|g| g.component_id == component.id && g.student_id == student_id)
                .and_then(|g| g.score),
        })
        .collect();

    compute_weighted_average(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(weight: f64, score: Option<f64>) -> WeightedEntry {
        WeightedEntry { weight, score }
    }

    #[test]
    fn test_validate_absent_score_is_valid() {
        assert_eq!(validate_score(None), Ok(None));
        assert_eq!(validate_score(Some(&serde_json::Value::Null)), Ok(None));
    }

    #[test]
    fn test_validate_boundary_scores() {
        assert_eq!(validate_score(Some(&json!(0))), Ok(Some(0.0)));
        assert_eq!(validate_score(Some(&json!(100))), Ok(Some(100.0)));
        assert_eq!(validate_score(Some(&json!(59.5))), Ok(Some(59.5)));
    }

    #[test]
    fn test_validate_out_of_range() {
        assert_eq!(validate_score(Some(&json!(-5))), Err(ScoreError::BelowMinimum));
        assert_eq!(
            validate_score(Some(&json!(101))),
            Err(ScoreError::AboveMaximum)
        );
        assert_eq!(
            validate_score(Some(&json!(-0.01))),
            Err(ScoreError::BelowMinimum)
        );
    }

    #[test]
    fn test_validate_permissive_numeric_parsing() {
        // 数字字符串按数值处理
        assert_eq!(validate_score(Some(&json!("87.5"))), Ok(Some(87.5)));
        assert_eq!(validate_score(Some(&json!(" 42 "))), Ok(Some(42.0)));
        assert_eq!(
            validate_score(Some(&json!("101"))),
            Err(ScoreError::AboveMaximum)
        );
    }

    #[test]
    fn test_validate_not_a_number() {
        assert_eq!(
            validate_score(Some(&json!("abc"))),
            Err(ScoreError::NotANumber)
        );
        assert_eq!(
            validate_score(Some(&json!(true))),
            Err(ScoreError::NotANumber)
        );
        assert_eq!(
            validate_score(Some(&json!([1, 2]))),
            Err(ScoreError::NotANumber)
        );
    }

    #[test]
    fn test_average_two_graded_components() {
        // (80*0.3 + 90*0.4) / 0.7 * 100 = 85.714... -> 85.7
        let entries = [entry(30.0, Some(80.0)), entry(40.0, Some(90.0))];
        assert_eq!(compute_weighted_average(&entries), Some(85.7));
    }

    #[test]
    fn test_average_partial_grading_renormalizes() {
        // 未评项不进分母：只按已评的 50% 计，均分等于该项分数
        let entries = [entry(50.0, Some(80.0)), entry(50.0, None)];
        assert_eq!(compute_weighted_average(&entries), Some(80.0));
    }

    #[test]
    fn test_average_zero_weight_excluded() {
        // 权重为 0 的项不参与，也不把它当作 0 分
        let entries = [entry(0.0, Some(100.0)), entry(60.0, Some(70.0))];
        assert_eq!(compute_weighted_average(&entries), Some(70.0));
    }

    #[test]
    fn test_average_not_computable() {
        assert_eq!(compute_weighted_average(&[]), None);
        assert_eq!(compute_weighted_average(&[entry(50.0, None)]), None);
        assert_eq!(compute_weighted_average(&[entry(0.0, Some(90.0))]), None);
    }

    #[test]
    fn test_average_zero_is_a_value() {
        // 0 分是合法可显示的均分，不等同于"不可计算"
        let entries = [entry(100.0, Some(0.0))];
        assert_eq!(compute_weighted_average(&entries), Some(0.0));
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let entries = [entry(30.0, Some(77.0)), entry(70.0, Some(81.0))];
        // (77*0.3 + 81*0.7) / 1.0 = 79.8
        assert_eq!(compute_weighted_average(&entries), Some(79.8));
    }

    #[test]
    fn test_average_for_student_joins_rows() {
        use chrono::Utc;

        let component = |id: i64, weight: f64| GradingComponent {
            id,
            assignment_id: 1,
            name: format!("c{id}"),
            weight,
            description: None,
            created_at: Utc::now(),
        };
        let grade = |component_id: i64, student_id: i64, score: Option<f64>| Grade {
            id: component_id * 100 + student_id,
            component_id,
            student_id,
            score,
            feedback: None,
            graded_by: 9,
            graded_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let components = vec![component(1, 30.0), component(2, 40.0)];
        let grades = vec![
            grade(1, 7, Some(80.0)),
            grade(2, 7, Some(90.0)),
            // 其他学生的成绩行不串台
            grade(1, 8, Some(10.0)),
        ];

        assert_eq!(average_for_student(&components, &grades, 7), Some(85.7));
        assert_eq!(average_for_student(&components, &grades, 8), Some(10.0));
        assert_eq!(average_for_student(&components, &grades, 9), None);
    }
}
