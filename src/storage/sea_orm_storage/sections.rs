//! 教学班存储操作

use super::SeaOrmStorage;
use crate::entity::class_sections::{ActiveModel, Column, Entity as ClassSections};
use crate::errors::{GradebookError, Result};
use crate::models::sections::{
    entities::ClassSection, requests::CreateSectionRequest, responses::SectionListResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 在课程下创建教学班
    pub async fn create_section_impl(
        &self,
        course_id: i64,
        lecturer_id: i64,
        section: CreateSectionRequest,
    ) -> Result<ClassSection> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            lecturer_id: Set(lecturer_id),
            name: Set(section.name),
            capacity: Set(section.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建教学班失败: {e}")))?;

        Ok(result.into_class_section())
    }

    /// 通过ID获取教学班
    pub async fn get_section_by_id_impl(&self, section_id: i64) -> Result<Option<ClassSection>> {
        let result = ClassSections::find_by_id(section_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询教学班失败: {e}")))?;

        Ok(result.map(|m| m.into_class_section()))
    }

    /// 列出课程下的教学班
    pub async fn list_sections_by_course_impl(
        &self,
        course_id: i64,
    ) -> Result<SectionListResponse> {
        let sections = ClassSections::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询教学班列表失败: {e}")))?;

        Ok(SectionListResponse {
            items: sections
                .into_iter()
                .map(|m| m.into_class_section())
                .collect(),
        })
    }
}
