use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业声明的评分项
//
// 历史数据存在两套字段拼写（name/title、weight/percent、description/desc），
// 通过 serde alias 在反序列化边界一次性归一化为统一形态，
// 下游消费方只见到规范字段，不做散落的兼容判断。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ComponentSpec {
    #[serde(alias = "title")]
    pub name: String,
    // 权重为百分比，各评分项之和不要求等于 100
    #[serde(alias = "percent")]
    pub weight: f64,
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
}

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub class_section_id: i64,
    // 作业归属讲师，评分写入的所有权校验以此为准
    pub lecturer_id: i64,
    pub title: String,
    pub content: Option<String>,
    // 有序的声明评分项列表
    pub components: Vec<ComponentSpec>,
    // 成绩对学生是否可见，讲师控制
    pub grades_visible: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 按下标取声明评分项，越界返回 None
    pub fn component_at(&self, index: usize) -> Option<&ComponentSpec> {
        self.components.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_spec_canonical_fields() {
        let spec: ComponentSpec =
            serde_json::from_str(r#"{"name":"Report","weight":40,"description":"written part"}"#)
                .unwrap();
        assert_eq!(spec.name, "Report");
        assert_eq!(spec.weight, 40.0);
        assert_eq!(spec.description.as_deref(), Some("written part"));
    }

    #[test]
    fn test_component_spec_legacy_fields() {
        // 旧拼写：title / percent / desc
        let spec: ComponentSpec =
            serde_json::from_str(r#"{"title":"Demo","percent":25.5,"desc":"live demo"}"#).unwrap();
        assert_eq!(spec.name, "Demo");
        assert_eq!(spec.weight, 25.5);
        assert_eq!(spec.description.as_deref(), Some("live demo"));
    }

    #[test]
    fn test_component_spec_mixed_list() {
        let specs: Vec<ComponentSpec> = serde_json::from_str(
            r#"[{"name":"Code","weight":60},{"title":"Report","percent":40}]"#,
        )
        .unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "Code");
        assert_eq!(specs[1].name, "Report");
        assert_eq!(specs[1].weight, 40.0);
        assert!(specs[0].description.is_none());
    }
}
