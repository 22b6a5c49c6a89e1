//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod enrollments;
mod grading;
mod groups;
mod sections;

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存数据库（单连接池，保证多次访问落在同一个内存库上）
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        Migrator::up(&db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, ComponentSpec},
        requests::CreateAssignmentRequest,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseListResponse,
    },
    enrollments::{
        entities::Enrollment, requests::EnrollmentQueryParams, responses::EnrollmentListResponse,
    },
    grading::entities::{Grade, GradingComponent},
    groups::{entities::Group, requests::CreateGroupRequest},
    sections::{
        entities::ClassSection, requests::CreateSectionRequest, responses::SectionListResponse,
    },
};
use crate::storage::{
    AddMemberOutcome, EnrollOutcome, SaveGradesOutcome, Storage, WithdrawOutcome,
};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    // 教学班模块
    async fn create_section(
        &self,
        course_id: i64,
        lecturer_id: i64,
        section: CreateSectionRequest,
    ) -> Result<ClassSection> {
        self.create_section_impl(course_id, lecturer_id, section)
            .await
    }

    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<ClassSection>> {
        self.get_section_by_id_impl(section_id).await
    }

    async fn list_sections_by_course(&self, course_id: i64) -> Result<SectionListResponse> {
        self.list_sections_by_course_impl(course_id).await
    }

    // 选课模块
    async fn enroll_student(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<EnrollOutcome> {
        self.enroll_student_impl(student_id, class_section_id).await
    }

    async fn withdraw_enrollment(
        &self,
        enrollment_id: i64,
        student_id: i64,
    ) -> Result<WithdrawOutcome> {
        self.withdraw_enrollment_impl(enrollment_id, student_id)
            .await
    }

    async fn list_student_enrollments(
        &self,
        student_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse> {
        self.list_student_enrollments_impl(student_id, query).await
    }

    async fn list_section_enrollments(
        &self,
        class_section_id: i64,
        query: EnrollmentQueryParams,
    ) -> Result<EnrollmentListResponse> {
        self.list_section_enrollments_impl(class_section_id, query)
            .await
    }

    async fn has_active_enrollment(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<bool> {
        self.has_active_enrollment_impl(student_id, class_section_id)
            .await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        class_section_id: i64,
        lecturer_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(class_section_id, lecturer_id, assignment)
            .await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_by_section(&self, class_section_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_section_impl(class_section_id)
            .await
    }

    async fn set_grades_visible(
        &self,
        assignment_id: i64,
        visible: bool,
    ) -> Result<Option<Assignment>> {
        self.set_grades_visible_impl(assignment_id, visible).await
    }

    // 小组模块
    async fn create_group(&self, assignment_id: i64, group: CreateGroupRequest) -> Result<Group> {
        self.create_group_impl(assignment_id, group).await
    }

    async fn add_group_member(&self, group_id: i64, student_id: i64) -> Result<AddMemberOutcome> {
        self.add_group_member_impl(group_id, student_id).await
    }

    async fn get_group_with_members(&self, group_id: i64) -> Result<Option<Group>> {
        self.get_group_with_members_impl(group_id).await
    }

    async fn list_groups_by_assignment(&self, assignment_id: i64) -> Result<Vec<Group>> {
        self.list_groups_by_assignment_impl(assignment_id).await
    }

    // 评分模块
    async fn get_or_create_component(
        &self,
        assignment_id: i64,
        spec: &ComponentSpec,
    ) -> Result<GradingComponent> {
        self.get_or_create_component_impl(assignment_id, spec).await
    }

    async fn save_group_grades(
        &self,
        component_id: i64,
        group_id: i64,
        score: Option<f64>,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<SaveGradesOutcome> {
        self.save_group_grades_impl(component_id, group_id, score, feedback, graded_by)
            .await
    }

    async fn list_components_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<GradingComponent>> {
        self.list_components_by_assignment_impl(assignment_id).await
    }

    async fn list_grades_by_assignment(&self, assignment_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_by_assignment_impl(assignment_id).await
    }

    async fn list_student_grades_for_assignment(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Grade>> {
        self.list_student_grades_for_assignment_impl(assignment_id, student_id)
            .await
    }
}
