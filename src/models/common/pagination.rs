use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 每页条数上限，挡住过大的 size 参数
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数（选课/课程列表共用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

impl PaginationQuery {
    /// 归一化后的页码（最小为 1），供 SeaORM 分页器使用
    pub fn page(&self) -> u64 {
        self.page.max(1) as u64
    }

    /// 归一化后的每页条数（1..=MAX_PAGE_SIZE）
    pub fn size(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE) as u64
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    /// 由分页器的统计结果构造
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 自定义反序列化函数，支持字符串到i64的转换（查询串里的数字以字符串到达）
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 10);
    }

    #[test]
    fn test_query_accepts_string_numbers() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":"3","size":"25"}"#).unwrap();
        assert_eq!(query.page, 3);
        assert_eq!(query.size, 25);
    }

    #[test]
    fn test_normalization_bounds() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":0,"size":1000}"#).unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.size(), MAX_PAGE_SIZE as u64);
    }

    #[test]
    fn test_pagination_info_from_paginator() {
        let info = PaginationInfo::new(2, 10, 31, 4);
        assert_eq!(info.page, 2);
        assert_eq!(info.page_size, 10);
        assert_eq!(info.total, 31);
        assert_eq!(info.total_pages, 4);
    }
}
