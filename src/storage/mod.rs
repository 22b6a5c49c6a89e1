use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseListResponse,
    },
    enrollments::{
        entities::Enrollment, requests::EnrollmentQueryParams, responses::EnrollmentConflict,
        responses::EnrollmentListResponse,
    },
    grading::entities::{Grade, GradingComponent},
    groups::{
        entities::{Group, GroupMember},
        requests::CreateGroupRequest,
    },
    sections::{entities::ClassSection, requests::CreateSectionRequest,
        responses::SectionListResponse},
};

use crate::errors::Result;
use crate::models::assignments::entities::ComponentSpec;

pub mod sea_orm_storage;

/// 选课结果
///
/// 守卫拒绝不是系统错误，用显式结果承载，服务层据此映射业务错误码。
#[derive(Debug)]
pub enum EnrollOutcome {
    Enrolled(Enrollment),
    // 教学班已满
    SectionFull,
    // 同一课程已有 active 选课，附冲突详情
    DuplicateCourse(EnrollmentConflict),
}

/// 退课结果
#[derive(Debug)]
pub enum WithdrawOutcome {
    Withdrawn(Enrollment),
    AlreadyWithdrawn,
    NotFound,
}

/// 添加小组成员结果
#[derive(Debug)]
pub enum AddMemberOutcome {
    Added(GroupMember),
    Duplicate,
    GroupNotFound,
}

/// 小组评分写入结果
#[derive(Debug)]
pub enum SaveGradesOutcome {
    // 事务内写入的成绩行 ID，按成员顺序
    Saved(Vec<i64>),
    GroupNotFoundOrEmpty,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程信息
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 通过课程代码获取课程信息
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;

    /// 教学班管理方法
    // 在课程下创建教学班
    async fn create_section(
        &self,
        course_id: i64,
        lecturer_id: i64,
        section: CreateSectionRequest,
    ) -> Result<ClassSection>;
    // 通过ID获取教学班信息
    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<ClassSection>>;
    // 列出课程下的教学班
    async fn list_sections_by_course(&self, course_id: i64) -> Result<SectionListResponse>;

    /// 选课管理方法
    // 学生选课（守卫：同课程查重 + 容量检查，事务内完成）
    async fn enroll_student(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<EnrollOutcome>;
    // 学生退课（保留历史行，status 置 withdrawn）
    async fn withdraw_enrollment(
        &self,
        enrollment_id: i64,
        student_id: i64,
    ) -> Result<WithdrawOutcome>;
    // 列出学生的选课记录
    async fn list_student_enrollments(
        &self,
        student_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse>;
    // 列出教学班的选课记录
    async fn list_section_enrollments(
        &self,
        class_section_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse>;
    // 学生在教学班是否有 active 选课
    async fn has_active_enrollment(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<bool>;

    /// 作业管理方法
    // 在教学班下创建作业
    async fn create_assignment(
        &self,
        class_section_id: i64,
        lecturer_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业信息
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出教学班下的作业
    async fn list_assignments_by_section(&self, class_section_id: i64) -> Result<Vec<Assignment>>;
    // 设置作业成绩可见性
    async fn set_grades_visible(
        &self,
        assignment_id: i64,
        visible: bool,
    ) -> Result<Option<Assignment>>;

    /// 小组管理方法
    // 在作业下创建小组
    async fn create_group(
        &self,
        assignment_id: i64,
        group: CreateGroupRequest,
    ) -> Result<Group>;
    // 添加小组成员
    async fn add_group_member(&self, group_id: i64, student_id: i64) -> Result<AddMemberOutcome>;
    // 获取小组及其成员
    async fn get_group_with_members(&self, group_id: i64) -> Result<Option<Group>>;
    // 列出作业下的小组（含成员）
    async fn list_groups_by_assignment(&self, assignment_id: i64) -> Result<Vec<Group>>;

    /// 评分管理方法
    // 解析评分项：按 (assignment_id, name) 取已有记录或物化新记录
    async fn get_or_create_component(
        &self,
        assignment_id: i64,
        spec: &ComponentSpec,
    ) -> Result<GradingComponent>;
    // 小组评分：事务内对每个成员各写一行（已有则原地更新）
    async fn save_group_grades(
        &self,
        component_id: i64,
        group_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<SaveGradesOutcome>;
    // 列出作业已物化的评分项
    async fn list_components_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<GradingComponent>>;
    // 列出作业下全部成绩行
    async fn list_grades_by_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>>;
    // 列出某学生在作业下的成绩行
    async fn list_student_grades_for_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Grade>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
