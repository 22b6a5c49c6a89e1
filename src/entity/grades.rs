//! 成绩实体
//!
//! 每个（评分项，学生）至多一行，复评原地更新，由唯一约束保证。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub component_id: i64,
    pub student_id: i64,
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_by: i64,
    pub graded_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grading_components::Entity",
        from = "Column::ComponentId",
        to = "super::grading_components::Column::Id"
    )]
    Component,
}

impl Related<super::grading_components::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_grade(self) -> crate::models::grading::entities::Grade {
        use crate::models::grading::entities::Grade;
        use chrono::{DateTime, Utc};

        Grade {
            id: self.id,
            component_id: self.component_id,
            student_id: self.student_id,
            score: self.score,
            feedback: self.feedback,
            graded_by: self.graded_by,
            graded_at: DateTime::<Utc>::from_timestamp(self.graded_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
