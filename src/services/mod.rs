pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod grading;
pub mod groups;
pub mod sections;

pub use assignments::AssignmentService;
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
pub use grading::GradingService;
pub use groups::GroupService;
pub use sections::SectionService;
