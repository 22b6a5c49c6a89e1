//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::class_sections::{
    ActiveModel as ClassSectionActiveModel, Entity as ClassSections, Model as ClassSectionModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::grading_components::{
    ActiveModel as GradingComponentActiveModel, Entity as GradingComponents,
    Model as GradingComponentModel,
};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::groups::{ActiveModel as GroupActiveModel, Entity as Groups, Model as GroupModel};
