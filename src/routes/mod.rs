pub mod assignments;

pub mod courses;

pub mod enrollments;

pub mod grading;

pub mod groups;

pub mod sections;

pub use assignments::configure_assignments_routes;
pub use courses::configure_courses_routes;
pub use enrollments::configure_enrollments_routes;
pub use grading::configure_grading_routes;
pub use groups::configure_groups_routes;
pub use sections::configure_sections_routes;
