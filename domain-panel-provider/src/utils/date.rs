//! 账单日期解析工具
//!
//! `endDate` 是自由格式文本，常见的两种写法：
//! - 纯日期: `2025-03-01`
//! - RFC3339 时间戳: `2025-03-01T00:00:00Z`

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 解析为日历日期，无法识别时返回 `None`
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
