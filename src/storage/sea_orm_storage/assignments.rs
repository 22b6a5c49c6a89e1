//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::class_sections::Entity as ClassSections;
use crate::errors::{GradebookError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 在教学班下创建作业
    pub async fn create_assignment_impl(
        &self,
        class_section_id: i64,
        lecturer_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let section = ClassSections::find_by_id(class_section_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询教学班失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("教学班 {class_section_id} 不存在"))
            })?;

        // 声明评分项以规范形态落库（alias 在反序列化时已归一化）
        let components = serde_json::to_string(&assignment.components)?;
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(section.course_id),
            class_section_id: Set(class_section_id),
            lecturer_id: Set(lecturer_id),
            title: Set(assignment.title),
            content: Set(assignment.content),
            components: Set(components),
            grades_visible: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建作业失败: {e}")))?;

        result.into_assignment()
    }

    /// 通过ID获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        result.map(|m| m.into_assignment()).transpose()
    }

    /// 列出教学班下的作业
    pub async fn list_assignments_by_section_impl(
        &self,
        class_section_id: i64,
    ) -> Result<Vec<Assignment>> {
        let assignments = Assignments::find()
            .filter(Column::ClassSectionId.eq(class_section_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业列表失败: {e}")))?;

        assignments
            .into_iter()
            .map(|m| m.into_assignment())
            .collect()
    }

    /// 设置作业成绩可见性
    pub async fn set_grades_visible_impl(
        &self,
        assignment_id: i64,
        visible: bool,
    ) -> Result<Option<Assignment>> {
        let existing = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.grades_visible = Set(visible);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新作业可见性失败: {e}")))?;

        Ok(Some(updated.into_assignment()?))
    }
}
