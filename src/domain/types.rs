// ==========================================
// 工程进度重算引擎 - 共享类型与日期规整
// ==========================================
// 职责: 在存储边界统一日期解析,消除各处临时解析
// 约束: 日期一律在读取时规整为 NaiveDate / NaiveDateTime
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// 日期写入数据库的统一格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 时间戳写入数据库的统一格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 宽容解析日期
///
/// 来源系统的日期字段可能以纯日期、日期时间或 RFC3339 文本出现,
/// 这里一次性规整,仓储层之外不再做任何日期解析。
///
/// # 返回
/// - Some(NaiveDate): 解析成功
/// - None: 空串或无法识别的格式
pub fn parse_date_flexible(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    None
}

/// 宽容解析时间戳 (纯日期按当日零点补齐)
pub fn parse_datetime_flexible(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    parse_date_flexible(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 日期转数据库文本
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 时间戳转数据库文本
pub fn format_datetime(ts: NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

/// 当前日期 (UTC)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 当前时间戳 (UTC)
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
