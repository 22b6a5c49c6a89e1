//! 路径参数安全提取器
//!
//! 把形如 `/courses/{course_id}` 的路径段解析为正整数 ID，
//! 解析失败时直接返回统一格式的 400 响应，不进入处理函数。

/// 定义一个从路径提取 i64 ID 的 newtype
///
/// 生成的类型同时实现 `FromRequest`（作为处理函数参数直接使用）
/// 和 `Deserialize`（嵌在 `web::Path<(..,)>` 元组里使用）。
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:expr) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                match raw.parse::<i64>() {
                    Ok(value) if value > 0 => Ok($name(value)),
                    _ => Err(serde::de::Error::custom(format!(
                        "Invalid path parameter {}: {}",
                        $param, raw
                    ))),
                }
            }
        }

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|value| *value > 0);

                let result = match parsed {
                    Some(value) => Ok($name(value)),
                    None => {
                        let message = format!("Invalid path parameter: {}", $param);
                        let response = actix_web::HttpResponse::BadRequest().json(
                            $crate::models::ApiResponse::error_empty(
                                $crate::models::ErrorCode::BadRequest,
                                &message,
                            ),
                        );
                        Err(actix_web::error::InternalError::from_response(message, response)
                            .into())
                    }
                };
                std::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeCourseIdI64, "course_id");
define_safe_i64_extractor!(SafeSectionIdI64, "section_id");
define_safe_i64_extractor!(SafeEnrollmentIdI64, "enrollment_id");
define_safe_i64_extractor!(SafeAssignmentIdI64, "assignment_id");
define_safe_i64_extractor!(SafeGroupIdI64, "group_id");
