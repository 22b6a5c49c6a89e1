//! 选课存储操作
//!
//! 选课守卫在这里落地：同课程查重与容量检查在一个事务内完成。
//! 同课程竞争由 (student_id, active_course_id) 唯一索引兜底；
//! 容量竞争在 PostgreSQL/MySQL 上由教学班行锁串行化，SQLite 单写者天然串行。

use super::SeaOrmStorage;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::prelude::{ClassSections, Courses};
use crate::errors::{GradebookError, Result};
use crate::models::{
    PaginationInfo,
    enrollments::{
        entities::EnrollmentStatus,
        requests::EnrollmentQueryParams,
        responses::{EnrollmentConflict, EnrollmentListResponse},
    },
};
use crate::storage::{EnrollOutcome, WithdrawOutcome};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 学生选课
    pub async fn enroll_student_impl(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<EnrollOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        // 锁住教学班行，并发选课的容量检查在行锁上串行；
        // SQLite 不支持 FOR UPDATE，单写者语义下也不需要
        let mut section_query = ClassSections::find_by_id(class_section_id);
        if txn.get_database_backend() != DatabaseBackend::Sqlite {
            section_query = section_query.lock_exclusive();
        }
        let section = section_query
            .one(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询教学班失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("教学班 {class_section_id} 不存在"))
            })?;

        // 容量检查：只数 active 行，退课的名额释放
        if let Some(capacity) = section.capacity {
            let active = Enrollments::find()
                .filter(Column::ClassSectionId.eq(class_section_id))
                .filter(Column::Status.eq(EnrollmentStatus::ACTIVE))
                .count(&txn)
                .await
                .map_err(|e| {
                    GradebookError::database_operation(format!("查询选课人数失败: {e}"))
                })?;

            if active >= capacity as u64 {
                return Ok(EnrollOutcome::SectionFull);
            }
        }

        // 同课程查重：同一学生在该课程下是否已有 active 选课（任意教学班）
        let existing = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ActiveCourseId.eq(section.course_id))
            .one(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))?;

        if let Some(existing) = existing {
            let conflict = Self::enrollment_conflict_details(&txn, existing.class_section_id)
                .await?;
            return Ok(EnrollOutcome::DuplicateCourse(conflict));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(student_id),
            class_section_id: Set(class_section_id),
            course_id: Set(section.course_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            active_course_id: Set(Some(section.course_id)),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&txn).await {
            Ok(inserted) => {
                txn.commit()
                    .await
                    .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;
                Ok(EnrollOutcome::Enrolled(inserted.into_enrollment()))
            }
            // 并发选课撞上唯一索引，等价于查重命中
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                drop(txn);
                let existing = Enrollments::find()
                    .filter(Column::StudentId.eq(student_id))
                    .filter(Column::ActiveCourseId.eq(section.course_id))
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        GradebookError::database_operation(format!("查询选课记录失败: {e}"))
                    })?;

                match existing {
                    Some(existing) => {
                        let conflict = Self::enrollment_conflict_details(
                            &self.db,
                            existing.class_section_id,
                        )
                        .await?;
                        Ok(EnrollOutcome::DuplicateCourse(conflict))
                    }
                    None => Err(GradebookError::conflict("选课记录冲突")),
                }
            }
            Err(e) => Err(GradebookError::database_operation(format!(
                "选课失败: {e}"
            ))),
        }
    }

    /// 组装选课冲突详情（冲突教学班 + 课程身份）
    async fn enrollment_conflict_details<C: ConnectionTrait>(
        conn: &C,
        class_section_id: i64,
    ) -> Result<EnrollmentConflict> {
        let section = ClassSections::find_by_id(class_section_id)
            .one(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询教学班失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("教学班 {class_section_id} 不存在"))
            })?;

        let course = Courses::find_by_id(section.course_id)
            .one(conn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询课程失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("课程 {} 不存在", section.course_id))
            })?;

        Ok(EnrollmentConflict {
            conflicting_section_id: section.id,
            conflicting_section_name: section.name,
            course_id: course.id,
            course_title: course.title,
        })
    }

    /// 学生退课
    pub async fn withdraw_enrollment_impl(
        &self,
        enrollment_id: i64,
        student_id: i64,
    ) -> Result<WithdrawOutcome> {
        let existing = Enrollments::find_by_id(enrollment_id)
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(WithdrawOutcome::NotFound);
        };

        if existing.status == EnrollmentStatus::WITHDRAWN {
            return Ok(WithdrawOutcome::AlreadyWithdrawn);
        }

        // 保留历史行：状态置 withdrawn，镜像列置空以释放唯一索引
        let now = chrono::Utc::now().timestamp();
        let mut model = existing.into_active_model();
        model.status = Set(EnrollmentStatus::Withdrawn.to_string());
        model.active_course_id = Set(None);
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("退课失败: {e}")))?;

        Ok(WithdrawOutcome::Withdrawn(updated.into_enrollment()))
    }

    /// 分页列出学生的选课记录
    pub async fn list_student_enrollments_impl(
        &self,
        student_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse> {
        let select = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::EnrolledAt);

        Self::paginate_enrollments(&self.db, select, query).await
    }

    /// 分页列出教学班的选课记录
    pub async fn list_section_enrollments_impl(
        &self,
        class_section_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse> {
        let select = Enrollments::find()
            .filter(Column::ClassSectionId.eq(class_section_id))
            .order_by_asc(Column::Id);

        Self::paginate_enrollments(&self.db, select, query).await
    }

    async fn paginate_enrollments<C: ConnectionTrait>(
        conn: &C,
        select: sea_orm::Select<Enrollments>,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse> {
        let page = query.pagination.page();
        let size = query.pagination.size();

        let paginator = select.paginate(conn, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课页数失败: {e}")))?;

        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(EnrollmentListResponse {
            items: enrollments
                .into_iter()
                .map(|m| m.into_enrollment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 学生在教学班是否有 active 选课
    pub async fn has_active_enrollment_impl(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassSectionId.eq(class_section_id))
            .filter(Column::Status.eq(EnrollmentStatus::ACTIVE))
            .count(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::sections::requests::CreateSectionRequest;

    async fn seed_course(storage: &SeaOrmStorage, code: &str) -> crate::models::courses::entities::Course {
        storage
            .create_course_impl(CreateCourseRequest {
                code: code.to_string(),
                title: format!("Course {code}"),
                credit: 3.0,
            })
            .await
            .unwrap()
    }

    async fn seed_section(
        storage: &SeaOrmStorage,
        course_id: i64,
        name: &str,
        capacity: Option<i32>,
    ) -> crate::models::sections::entities::ClassSection {
        storage
            .create_section_impl(
                course_id,
                100,
                CreateSectionRequest {
                    lecturer_id: None,
                    name: name.to_string(),
                    capacity,
                },
            )
            .await
            .unwrap()
    }

    fn default_query() -> EnrollmentQueryParams {
        serde_json::from_str("{}").unwrap()
    }

    #[tokio::test]
    async fn test_enroll_and_list() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section = seed_section(&storage, course.id, "CS101-A", None).await;

        let outcome = storage.enroll_student_impl(7, section.id).await.unwrap();
        let enrollment = match outcome {
            EnrollOutcome::Enrolled(e) => e,
            other => panic!("expected Enrolled, got {other:?}"),
        };
        assert_eq!(enrollment.student_id, 7);
        assert_eq!(enrollment.course_id, course.id);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);

        let list = storage
            .list_student_enrollments_impl(7, default_query())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.pagination.total, 1);

        assert!(storage.has_active_enrollment_impl(7, section.id).await.unwrap());
        assert!(!storage.has_active_enrollment_impl(8, section.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_course_blocked_across_sections() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section_a = seed_section(&storage, course.id, "CS101-A", None).await;
        let section_b = seed_section(&storage, course.id, "CS101-B", None).await;

        let first = storage.enroll_student_impl(7, section_a.id).await.unwrap();
        assert!(matches!(first, EnrollOutcome::Enrolled(_)));

        // 同一课程的另一个教学班也被拒绝，冲突详情指向已有选课
        let second = storage.enroll_student_impl(7, section_b.id).await.unwrap();
        match second {
            EnrollOutcome::DuplicateCourse(conflict) => {
                assert_eq!(conflict.conflicting_section_id, section_a.id);
                assert_eq!(conflict.conflicting_section_name, "CS101-A");
                assert_eq!(conflict.course_id, course.id);
                assert_eq!(conflict.course_title, "Course CS101");
            }
            other => panic!("expected DuplicateCourse, got {other:?}"),
        }

        // 守卫失败不产生新行
        let list = storage
            .list_student_enrollments_impl(7, default_query())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
    }

    #[tokio::test]
    async fn test_different_courses_allowed() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let cs = seed_course(&storage, "CS101").await;
        let math = seed_course(&storage, "MATH201").await;
        let cs_section = seed_section(&storage, cs.id, "CS101-A", None).await;
        let math_section = seed_section(&storage, math.id, "MATH201-A", None).await;

        assert!(matches!(
            storage.enroll_student_impl(7, cs_section.id).await.unwrap(),
            EnrollOutcome::Enrolled(_)
        ));
        assert!(matches!(
            storage.enroll_student_impl(7, math_section.id).await.unwrap(),
            EnrollOutcome::Enrolled(_)
        ));
    }

    #[tokio::test]
    async fn test_section_capacity_enforced() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section = seed_section(&storage, course.id, "CS101-A", Some(1)).await;

        assert!(matches!(
            storage.enroll_student_impl(7, section.id).await.unwrap(),
            EnrollOutcome::Enrolled(_)
        ));
        assert!(matches!(
            storage.enroll_student_impl(8, section.id).await.unwrap(),
            EnrollOutcome::SectionFull
        ));
    }

    #[tokio::test]
    async fn test_withdraw_then_reenroll() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section = seed_section(&storage, course.id, "CS101-A", None).await;

        let enrollment = match storage.enroll_student_impl(7, section.id).await.unwrap() {
            EnrollOutcome::Enrolled(e) => e,
            other => panic!("expected Enrolled, got {other:?}"),
        };

        let withdrawn = storage
            .withdraw_enrollment_impl(enrollment.id, 7)
            .await
            .unwrap();
        match withdrawn {
            WithdrawOutcome::Withdrawn(e) => {
                assert_eq!(e.status, EnrollmentStatus::Withdrawn);
            }
            other => panic!("expected Withdrawn, got {other:?}"),
        }

        // 重复退课
        assert!(matches!(
            storage.withdraw_enrollment_impl(enrollment.id, 7).await.unwrap(),
            WithdrawOutcome::AlreadyWithdrawn
        ));

        // 退课后同课程可以重新选，历史行保留
        assert!(matches!(
            storage.enroll_student_impl(7, section.id).await.unwrap(),
            EnrollOutcome::Enrolled(_)
        ));
        let list = storage
            .list_student_enrollments_impl(7, default_query())
            .await
            .unwrap();
        assert_eq!(list.items.len(), 2);
    }

    #[tokio::test]
    async fn test_withdraw_requires_owner() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section = seed_section(&storage, course.id, "CS101-A", None).await;

        let enrollment = match storage.enroll_student_impl(7, section.id).await.unwrap() {
            EnrollOutcome::Enrolled(e) => e,
            other => panic!("expected Enrolled, got {other:?}"),
        };

        // 别人的选课记录对自己不可见
        assert!(matches!(
            storage.withdraw_enrollment_impl(enrollment.id, 8).await.unwrap(),
            WithdrawOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_withdraw_releases_capacity() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let course = seed_course(&storage, "CS101").await;
        let section = seed_section(&storage, course.id, "CS101-A", Some(1)).await;

        let enrollment = match storage.enroll_student_impl(7, section.id).await.unwrap() {
            EnrollOutcome::Enrolled(e) => e,
            other => panic!("expected Enrolled, got {other:?}"),
        };
        assert!(matches!(
            storage.enroll_student_impl(8, section.id).await.unwrap(),
            EnrollOutcome::SectionFull
        ));

        storage
            .withdraw_enrollment_impl(enrollment.id, 7)
            .await
            .unwrap();

        assert!(matches!(
            storage.enroll_student_impl(8, section.id).await.unwrap(),
            EnrollOutcome::Enrolled(_)
        ));
    }
}
