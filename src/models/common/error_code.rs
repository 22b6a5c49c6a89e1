use serde::{Deserialize, Serialize};
use ts_rs::TS;

// API 业务错误码
//
// 每个失败路径携带一个稳定的机器可判别错误码和一条人类可读消息，
// 供前端做分支判断，不依赖 HTTP 状态码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error-code.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,

    // 课程与教学班 2xxx
    CourseNotFound = 2001,
    CourseAlreadyExists = 2002,
    CourseCreationFailed = 2003,
    SectionNotFound = 2011,
    SectionCreationFailed = 2012,

    // 选课 3xxx
    EnrollmentNotFound = 3001,
    DuplicateCourseEnrollment = 3002,
    ClassFull = 3003,
    AlreadyWithdrawn = 3004,
    EnrollFailed = 3005,
    WithdrawFailed = 3006,
    NotEnrolled = 3007,

    // 作业与评分 4xxx
    AssignmentNotFound = 4001,
    AssignmentCreationFailed = 4002,
    NotAssignmentOwner = 4003,
    ComponentIndexOutOfRange = 4004,
    GroupNotFoundOrEmpty = 4005,
    GroupCreationFailed = 4006,
    GroupMemberAlreadyExists = 4007,
    ScoreNotANumber = 4011,
    ScoreBelowMinimum = 4012,
    ScoreAboveMaximum = 4013,
    GradeSaveFailed = 4014,

    // 服务端错误 5xxx
    InternalServerError = 5000,
}
