pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod score;
pub mod sql;

pub use extractor::{
    SafeAssignmentIdI64, SafeCourseIdI64, SafeEnrollmentIdI64, SafeGroupIdI64, SafeSectionIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
