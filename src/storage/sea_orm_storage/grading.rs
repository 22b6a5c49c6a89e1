//! 评分存储操作
//!
//! 评分项解析（insert-or-get）与小组成绩的事务内逐成员写入。

use super::SeaOrmStorage;
use crate::entity::grades::{
    ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as Grades,
};
use crate::entity::grading_components::{ActiveModel, Column, Entity as GradingComponents};
use crate::entity::group_members::{Column as GroupMemberColumn, Entity as GroupMembers};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::entities::ComponentSpec;
use crate::models::grading::entities::{Grade, GradingComponent};
use crate::storage::SaveGradesOutcome;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 解析评分项
    ///
    /// 同一 (assignment_id, name) 永远解析到同一条记录：
    /// 先查后插，插入撞唯一约束时回读并发写入的那条。
    pub async fn get_or_create_component_impl(
        &self,
        assignment_id: i64,
        spec: &ComponentSpec,
    ) -> Result<GradingComponent> {
        let existing = GradingComponents::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::Name.eq(&spec.name))
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分项失败: {e}")))?;

        if let Some(existing) = existing {
            return Ok(existing.into_grading_component());
        }

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            name: Set(spec.name.clone()),
            weight: Set(spec.weight),
            description: Set(spec.description.clone()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(result.into_grading_component()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let existing = GradingComponents::find()
                    .filter(Column::AssignmentId.eq(assignment_id))
                    .filter(Column::Name.eq(&spec.name))
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        GradebookError::database_operation(format!("查询评分项失败: {e}"))
                    })?;

                existing
                    .map(|m| m.into_grading_component())
                    .ok_or_else(|| GradebookError::conflict("评分项记录冲突"))
            }
            Err(e) => Err(GradebookError::database_operation(format!(
                "创建评分项失败: {e}"
            ))),
        }
    }

    /// 小组评分写入
    ///
    /// 事务内对每个成员写一行（已有则原地更新），要么全部成功要么全部回滚，
    /// 不会留下"组里一半人有成绩"的中间状态。
    pub async fn save_group_grades_impl(
        &self,
        component_id: i64,
        group_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<SaveGradesOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        let members = GroupMembers::find()
            .filter(GroupMemberColumn::GroupId.eq(group_id))
            .order_by_asc(GroupMemberColumn::Id)
            .all(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询小组成员失败: {e}")))?;

        if members.is_empty() {
            return Ok(SaveGradesOutcome::GroupNotFoundOrEmpty);
        }

        let now = chrono::Utc::now().timestamp();
        let mut saved = Vec::with_capacity(members.len());

        for member in members {
            let existing = Grades::find()
                .filter(GradeColumn::ComponentId.eq(component_id))
                .filter(GradeColumn::StudentId.eq(member.student_id))
                .one(&txn)
                .await
                .map_err(|e| {
                    GradebookError::database_operation(format!("查询成绩行失败: {e}"))
                })?;

            match existing {
                // 复评：原地更新，不产生第二行
                Some(row) => {
                    let mut model = row.into_active_model();
                    model.score = Set(score);
                    model.feedback = Set(feedback.clone());
                    model.graded_by = Set(graded_by);
                    model.graded_at = Set(now);
                    model.updated_at = Set(now);

                    let updated = model.update(&txn).await.map_err(|e| {
                        GradebookError::database_operation(format!("更新成绩行失败: {e}"))
                    })?;
                    saved.push(updated.id);
                }
                None => {
                    let model = GradeActiveModel {
                        component_id: Set(component_id),
                        student_id: Set(member.student_id),
                        score: Set(score),
                        feedback: Set(feedback.clone()),
                        graded_by: Set(graded_by),
                        graded_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };

                    let inserted = model.insert(&txn).await.map_err(|e| {
                        GradebookError::database_operation(format!("写入成绩行失败: {e}"))
                    })?;
                    saved.push(inserted.id);
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(SaveGradesOutcome::Saved(saved))
    }

    /// 列出作业已物化的评分项
    pub async fn list_components_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<GradingComponent>> {
        let components = GradingComponents::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分项失败: {e}")))?;

        Ok(components
            .into_iter()
            .map(|m| m.into_grading_component())
            .collect())
    }

    /// 列出作业下全部成绩行
    pub async fn list_grades_by_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        let component_ids = self.component_ids_of_assignment(assignment_id).await?;
        if component_ids.is_empty() {
            return Ok(vec![]);
        }

        let grades = Grades::find()
            .filter(GradeColumn::ComponentId.is_in(component_ids))
            .order_by_asc(GradeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩行失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 列出某学生在作业下的成绩行
    pub async fn list_student_grades_for_assignment_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Grade>> {
        let component_ids = self.component_ids_of_assignment(assignment_id).await?;
        if component_ids.is_empty() {
            return Ok(vec![]);
        }

        let grades = Grades::find()
            .filter(GradeColumn::ComponentId.is_in(component_ids))
            .filter(GradeColumn::StudentId.eq(student_id))
            .order_by_asc(GradeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩行失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    async fn component_ids_of_assignment(&self, assignment_id: i64) -> Result<Vec<i64>> {
        let components = GradingComponents::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分项失败: {e}")))?;

        Ok(components.iter().map(|c| c.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::groups::requests::CreateGroupRequest;
    use crate::models::sections::requests::CreateSectionRequest;
    use crate::storage::AddMemberOutcome;

    struct Fixture {
        storage: SeaOrmStorage,
        assignment_id: i64,
        group_id: i64,
    }

    // 课程 -> 教学班 -> 带两个评分项的作业 -> 三人小组
    async fn setup() -> Fixture {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();

        let course = storage
            .create_course_impl(CreateCourseRequest {
                code: "CS101".to_string(),
                title: "Intro".to_string(),
                credit: 3.0,
            })
            .await
            .unwrap();

        let section = storage
            .create_section_impl(
                course.id,
                100,
                CreateSectionRequest {
                    lecturer_id: None,
                    name: "CS101-A".to_string(),
                    capacity: None,
                },
            )
            .await
            .unwrap();

        let assignment = storage
            .create_assignment_impl(
                section.id,
                100,
                serde_json::from_str::<CreateAssignmentRequest>(
                    r#"{
                        "title": "Project",
                        "content": null,
                        "components": [
                            {"name": "Code", "weight": 60},
                            {"name": "Report", "weight": 40}
                        ]
                    }"#,
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let group = storage
            .create_group_impl(
                assignment.id,
                CreateGroupRequest {
                    name: "Team 1".to_string(),
                },
            )
            .await
            .unwrap();

        for student_id in [7, 8, 9] {
            let outcome = storage
                .add_group_member_impl(group.id, student_id)
                .await
                .unwrap();
            assert!(matches!(outcome, AddMemberOutcome::Added(_)));
        }

        Fixture {
            storage,
            assignment_id: assignment.id,
            group_id: group.id,
        }
    }

    fn spec(name: &str, weight: f64) -> ComponentSpec {
        ComponentSpec {
            name: name.to_string(),
            weight,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_component_resolution_is_idempotent() {
        let fx = setup().await;

        let first = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();
        let second = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();

        // 同名评分项解析到同一条记录
        assert_eq!(first.id, second.id);

        let components = fx
            .storage
            .list_components_by_assignment_impl(fx.assignment_id)
            .await
            .unwrap();
        assert_eq!(components.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_names_materialize_separately() {
        let fx = setup().await;

        let code = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();
        let report = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Report", 40.0))
            .await
            .unwrap();

        assert_ne!(code.id, report.id);
        assert_eq!(report.weight, 40.0);
    }

    #[tokio::test]
    async fn test_group_grade_fans_out_to_all_members() {
        let fx = setup().await;
        let component = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();

        let outcome = fx
            .storage
            .save_group_grades_impl(component.id, fx.group_id, Some(88.0), None, 100)
            .await
            .unwrap();

        let saved = match outcome {
            SaveGradesOutcome::Saved(ids) => ids,
            other => panic!("expected Saved, got {other:?}"),
        };
        assert_eq!(saved.len(), 3);

        let grades = fx
            .storage
            .list_grades_by_assignment_impl(fx.assignment_id)
            .await
            .unwrap();
        assert_eq!(grades.len(), 3);
        let mut students: Vec<i64> = grades.iter().map(|g| g.student_id).collect();
        students.sort_unstable();
        assert_eq!(students, vec![7, 8, 9]);
        assert!(grades.iter().all(|g| g.score == Some(88.0)));
        assert!(grades.iter().all(|g| g.graded_by == 100));
    }

    #[tokio::test]
    async fn test_regrade_updates_in_place() {
        let fx = setup().await;
        let component = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();

        fx.storage
            .save_group_grades_impl(component.id, fx.group_id, Some(70.0), None, 100)
            .await
            .unwrap();
        fx.storage
            .save_group_grades_impl(
                component.id,
                fx.group_id,
                Some(92.5),
                Some("better".to_string()),
                100,
            )
            .await
            .unwrap();

        // 每（评分项，学生）仍然只有一行，分数是最新值
        let grades = fx
            .storage
            .list_grades_by_assignment_impl(fx.assignment_id)
            .await
            .unwrap();
        assert_eq!(grades.len(), 3);
        assert!(grades.iter().all(|g| g.score == Some(92.5)));
        assert!(grades.iter().all(|g| g.feedback.as_deref() == Some("better")));
    }

    #[tokio::test]
    async fn test_empty_group_rejected() {
        let fx = setup().await;
        let component = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Code", 60.0))
            .await
            .unwrap();

        let empty = fx
            .storage
            .create_group_impl(
                fx.assignment_id,
                CreateGroupRequest {
                    name: "Empty".to_string(),
                },
            )
            .await
            .unwrap();

        let outcome = fx
            .storage
            .save_group_grades_impl(component.id, empty.id, Some(50.0), None, 100)
            .await
            .unwrap();
        assert!(matches!(outcome, SaveGradesOutcome::GroupNotFoundOrEmpty));

        // 不存在的小组同样拒绝
        let outcome = fx
            .storage
            .save_group_grades_impl(component.id, 9999, Some(50.0), None, 100)
            .await
            .unwrap();
        assert!(matches!(outcome, SaveGradesOutcome::GroupNotFoundOrEmpty));
    }

    #[tokio::test]
    async fn test_duplicate_member_rejected() {
        let fx = setup().await;

        let outcome = fx.storage.add_group_member_impl(fx.group_id, 7).await.unwrap();
        assert!(matches!(outcome, AddMemberOutcome::Duplicate));

        let outcome = fx.storage.add_group_member_impl(9999, 7).await.unwrap();
        assert!(matches!(outcome, AddMemberOutcome::GroupNotFound));
    }

    #[tokio::test]
    async fn test_ungraded_score_stored_as_null() {
        let fx = setup().await;
        let component = fx
            .storage
            .get_or_create_component_impl(fx.assignment_id, &spec("Report", 40.0))
            .await
            .unwrap();

        // 只写反馈不打分
        fx.storage
            .save_group_grades_impl(
                component.id,
                fx.group_id,
                None,
                Some("pending review".to_string()),
                100,
            )
            .await
            .unwrap();

        let grades = fx
            .storage
            .list_student_grades_for_assignment_impl(fx.assignment_id, 7)
            .await
            .unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].score, None);
        assert_eq!(grades[0].feedback.as_deref(), Some("pending review"));
    }
}
