use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 选课状态
//
// 退课不删行，状态机只有 active -> withdrawn 一条转移；
// none -> active 由选课守卫把关（同课程查重 + 容量）。
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Active,    // 在读
    Withdrawn, // 已退课
}

impl EnrollmentStatus {
    pub const ACTIVE: &'static str = "active";
    pub const WITHDRAWN: &'static str = "withdrawn";
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            EnrollmentStatus::ACTIVE => Ok(EnrollmentStatus::Active),
            EnrollmentStatus::WITHDRAWN => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(serde::de::Error::custom(format!(
                "无效的选课状态: '{s}'. 支持的状态: active, withdrawn"
            ))),
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "{}", EnrollmentStatus::ACTIVE),
            EnrollmentStatus::Withdrawn => write!(f, "{}", EnrollmentStatus::WITHDRAWN),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub class_section_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
