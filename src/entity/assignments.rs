//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub class_section_id: i64,
    pub lecturer_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    // 声明的评分项列表，JSON 数组（历史上存在两套字段拼写，
    // 反序列化时统一归一化，见 models::assignments::ComponentSpec）
    #[sea_orm(column_type = "Text")]
    pub components: String,
    pub grades_visible: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_sections::Entity",
        from = "Column::ClassSectionId",
        to = "super::class_sections::Column::Id"
    )]
    ClassSection,
    #[sea_orm(has_many = "super::grading_components::Entity")]
    GradingComponents,
    #[sea_orm(has_many = "super::groups::Entity")]
    Groups,
}

impl Related<super::class_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSection.def()
    }
}

impl Related<super::grading_components::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradingComponents.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(
        self,
    ) -> crate::errors::Result<crate::models::assignments::entities::Assignment> {
        use crate::models::assignments::entities::{Assignment, ComponentSpec};
        use chrono::{DateTime, Utc};

        let components: Vec<ComponentSpec> = serde_json::from_str(&self.components)?;

        Ok(Assignment {
            id: self.id,
            course_id: self.course_id,
            class_section_id: self.class_section_id,
            lecturer_id: self.lecturer_id,
            title: self.title,
            content: self.content,
            components,
            grades_visible: self.grades_visible,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
