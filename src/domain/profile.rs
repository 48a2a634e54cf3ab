//! 用户展示偏好（时区、日期/时间格式）

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use std::fmt::Write;

/// 请求级别的用户偏好
///
/// 由 handler 显式传入，不使用全局状态
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub timezone: FixedOffset,
    pub date_format: String,
    pub time_format: String,
}

impl UserProfile {
    pub fn new(
        timezone: FixedOffset,
        date_format: impl Into<String>,
        time_format: impl Into<String>,
    ) -> Self {
        Self {
            timezone,
            date_format: date_format.into(),
            time_format: time_format.into(),
        }
    }

    /// 将 UTC 时间转换为用户时区并按用户格式输出
    ///
    /// 用户格式无效时退回 `%Y-%m-%d %H:%M:%S`
    pub fn from_utc_to_user(&self, utc: NaiveDateTime) -> String {
        let local = self.timezone.from_utc_datetime(&utc);
        let format = format!("{} {}", self.date_format, self.time_format);

        let mut out = String::new();
        if write!(out, "{}", local.format(&format)).is_err() {
            return local.format(FALLBACK_FORMAT).to_string();
        }
        out
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(utc(), DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT)
    }
}

pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn utc() -> FixedOffset {
    Utc.fix()
}

/// 解析 UTC 偏移
///
/// 支持 `UTC`、`Z`、`+02:00`、`-0530`、`+3`
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") || value.is_empty() {
        return Some(utc());
    }

    let (sign, rest) = match value.as_bytes()[0] {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };

    let (hours, minutes) = if let Some((h, m)) = rest.split_once(':') {
        (h, m)
    } else if rest.len() == 4 {
        (rest.get(..2)?, rest.get(2..)?)
    } else {
        (rest, "0")
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_utc_offset("-0530").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("+3").unwrap().local_minus_utc(), 10800);
        assert!(parse_utc_offset("Europe/Warsaw").is_none());
        assert!(parse_utc_offset("+25:00").is_none());
    }

    #[test]
    fn test_parse_utc_offset_rejects_non_ascii() {
        assert!(parse_utc_offset("+1é1").is_none());
        assert!(parse_utc_offset("-é:00").is_none());
        assert!(parse_utc_offset("+０２００").is_none());
    }

    #[test]
    fn test_from_utc_to_user() {
        let profile = UserProfile::new(
            parse_utc_offset("+02:00").unwrap(),
            "%Y-%m-%d",
            "%H:%M:%S",
        );
        assert_eq!(
            profile.from_utc_to_user(ts("2013-05-01T10:00:00")),
            "2013-05-01 12:00:00"
        );
    }

    #[test]
    fn test_from_utc_to_user_crosses_date() {
        let profile = UserProfile::new(parse_utc_offset("-11:00").unwrap(), "%d-%m-%Y", "%H:%M");
        assert_eq!(
            profile.from_utc_to_user(ts("2013-05-01T10:00:00")),
            "30-04-2013 23:00"
        );
    }

    #[test]
    fn test_invalid_format_falls_back() {
        let profile = UserProfile::new(parse_utc_offset("UTC").unwrap(), "%Q", "%H");
        assert_eq!(
            profile.from_utc_to_user(ts("2013-05-01T10:00:00")),
            "2013-05-01 10:00:00"
        );
    }

    #[test]
    fn test_default_profile_is_utc() {
        let profile = UserProfile::default();
        assert_eq!(
            profile.from_utc_to_user(ts("2013-05-01T10:00:00")),
            "01-05-2013 10:00:00"
        );
    }
}
