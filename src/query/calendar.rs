// query/calendar.rs - 日期与时间子语法
//! 把俄语日期/时间表达归一化为日历日期与时刻
//!
//! 日期写法（按尝试顺序，第一个成功的阶段生效）:
//! - 相对日期: "вчера", "сегодня", "завтра", "за неделю", "за месяц"
//! - 跨月范围: "с 1 ноября 2025 по 5 декабря 2025", "01.11.2025 - 05.12.2025"
//! - 同月范围: "с 1 по 5 ноября 2025", "от 1 до 5 ноября 2025", "1-5 ноября 2025"
//! - 单个日期: "28 ноября 2025", "28.11.2025"
//! - 月份+年份: "в июне 2025" (整月)
//! - ISO: "2025-11-28"
//!
//! 时间写法: "с 10:00 до 15:00", "с 10 до 15 часов", "с 10 до 15"
//!
//! 所有函数都要求输入已转为小写。相对日期依赖调用方传入的参考日期 `today`。

use chrono::{Days, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::types::DateRange;

/// 月份名 -> 月份序号（属格、前置格、主格）
pub const MONTHS: &[(&str, u32)] = &[
    // 属格: "28 ноября 2025"
    ("января", 1), ("февраля", 2), ("марта", 3), ("апреля", 4),
    ("мая", 5), ("июня", 6), ("июля", 7), ("августа", 8),
    ("сентября", 9), ("октября", 10), ("ноября", 11), ("декабря", 12),
    // 前置格: "в июне 2025"
    ("январе", 1), ("феврале", 2), ("марте", 3), ("апреле", 4),
    ("мае", 5), ("июне", 6), ("июле", 7), ("августе", 8),
    ("сентябре", 9), ("октябре", 10), ("ноябре", 11), ("декабре", 12),
    // 主格: "за ноябрь 2025"
    ("январь", 1), ("февраль", 2), ("март", 3), ("апрель", 4),
    ("май", 5), ("июнь", 6), ("июль", 7), ("август", 8),
    ("сентябрь", 9), ("октябрь", 10), ("ноябрь", 11), ("декабрь", 12),
];

/// 查询月份序号
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(form, _)| *form == name)
        .map(|(_, month)| *month)
}

// 月份名备选分支，长词形在前（"марта" 先于 "март"）
static MONTH_ALT: Lazy<String> = Lazy::new(|| {
    let mut forms: Vec<&str> = MONTHS.iter().map(|(form, _)| *form).collect();
    forms.sort_by_key(|form| std::cmp::Reverse(form.chars().count()));
    forms.join("|")
});

fn month_regex(template: &str) -> Regex {
    Regex::new(&template.replace("{M}", &MONTH_ALT)).unwrap()
}

// 正则表达式预编译
static RANGE_TWO_MONTHS: Lazy<Regex> = Lazy::new(|| {
    month_regex(r"\bс\s+(\d{1,2})\s+({M})\s+(\d{4})(?:\s+года)?\s+(?:по|до)\s+(\d{1,2})\s+({M})\s+(\d{4})")
});

static RANGE_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\s*(?:-|–|по|до)\s*(\d{1,2})\.(\d{1,2})\.(\d{4})\b").unwrap()
});

static RANGE_SAME_MONTH: Lazy<Regex> = Lazy::new(|| {
    month_regex(r"\b(?:с|от)\s+(\d{1,2})\s+(?:по|до)\s+(\d{1,2})\s+({M})\s+(\d{4})")
});

static RANGE_DASH: Lazy<Regex> = Lazy::new(|| {
    month_regex(r"\b(\d{1,2})\s*[-–]\s*(\d{1,2})\s+({M})\s+(\d{4})")
});

static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| {
    month_regex(r"\b(\d{1,2})\s+({M})\s+(\d{4})")
});

static SINGLE_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b").unwrap()
});

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| month_regex(r"\b({M})\s+(\d{4})\b"));

static MONTH_WORD: Lazy<Regex> = Lazy::new(|| month_regex(r"\b(?:{M})\b"));

static FOLLOWED_BY_MONTH: Lazy<Regex> = Lazy::new(|| month_regex(r"^\s+(?:{M})\b"));

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap()
});

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static TIME_COLON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bс\s+(\d{1,2}):(\d{2})\s+(?:до|по)\s+(\d{1,2}):(\d{2})\b").unwrap()
});

static TIME_HOURS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bс\s+(\d{1,2})\s+(?:до|по)\s+(\d{1,2})\s*(?:часов|часа|ч)\b").unwrap()
});

static TIME_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bс\s+(\d{1,2})\s+(?:до|по)\s+(\d{1,2})\b").unwrap()
});

/// 从文本中解析日期范围
///
/// 各阶段独立尝试，第一个成功的阶段生效；无效的日/月组合只让当前写法失败。
pub fn parse_dates(text: &str, today: NaiveDate) -> Option<DateRange> {
    relative_range(text, today)
        .or_else(|| explicit_range(text))
        .or_else(|| same_month_range(text))
        .or_else(|| single_date(text))
        .or_else(|| month_year(text))
        .or_else(|| iso_date(text))
}

/// 解析时间段，结果为 (开始, 结束)
pub fn parse_time_range(text: &str) -> Option<(NaiveTime, NaiveTime)> {
    if let Some(caps) = TIME_COLON.captures(text) {
        let start = hm(&caps, 1, Some(2));
        let end = hm(&caps, 3, Some(4));
        if let (Some(start), Some(end)) = (start, end) {
            return Some((start, end));
        }
    }

    if let Some(caps) = TIME_HOURS.captures(text) {
        if let (Some(start), Some(end)) = (hm(&caps, 1, None), hm(&caps, 2, None)) {
            return Some((start, end));
        }
    }

    // "с 1 по 5 ноября" 是日期范围，不是时段
    let caps = TIME_BARE.captures(text)?;
    let rest = &text[caps.get(0)?.end()..];
    if FOLLOWED_BY_MONTH.is_match(rest) {
        return None;
    }
    Some((hm(&caps, 1, None)?, hm(&caps, 2, None)?))
}

/// 日期范围，或者 "2025 год" 这类整年表达（文中未出现月份名时）
pub fn parse_date_period(text: &str, today: NaiveDate) -> Option<DateRange> {
    parse_dates(text, today).or_else(|| {
        if text.contains("год") && !mentions_month(text) {
            parse_year(text)
        } else {
            None
        }
    })
}

/// 文中第一个 20xx 年份对应的整年
pub fn parse_year(text: &str) -> Option<DateRange> {
    let caps = YEAR.captures(text)?;
    DateRange::year(caps.get(1)?.as_str().parse().ok()?)
}

/// 文中是否出现任意月份名
pub fn mentions_month(text: &str) -> bool {
    MONTH_WORD.is_match(text)
}

fn relative_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    if text.contains("вчера") {
        return today.checked_sub_days(Days::new(1)).map(DateRange::single);
    }
    if text.contains("сегодня") {
        return Some(DateRange::single(today));
    }
    if text.contains("завтра") {
        return today.checked_add_days(Days::new(1)).map(DateRange::single);
    }
    if text.contains("неделю") || text.contains("недели") {
        return today
            .checked_sub_days(Days::new(7))
            .map(|start| DateRange::new(start, today));
    }
    if text.contains("месяц") {
        return today
            .checked_sub_days(Days::new(30))
            .map(|start| DateRange::new(start, today));
    }
    None
}

fn explicit_range(text: &str) -> Option<DateRange> {
    let by_name = RANGE_TWO_MONTHS.captures(text).and_then(|caps| {
        let start = named_date(&caps, 1, 2, 3)?;
        let end = named_date(&caps, 4, 5, 6)?;
        Some(DateRange::new(start, end))
    });
    by_name.or_else(|| {
        let caps = RANGE_NUMERIC.captures(text)?;
        let start = numeric_date(&caps, 1, 2, 3)?;
        let end = numeric_date(&caps, 4, 5, 6)?;
        Some(DateRange::new(start, end))
    })
}

fn same_month_range(text: &str) -> Option<DateRange> {
    [&*RANGE_SAME_MONTH, &*RANGE_DASH].into_iter().find_map(|re| {
        let caps = re.captures(text)?;
        let start = named_date(&caps, 1, 3, 4)?;
        let end = named_date(&caps, 2, 3, 4)?;
        Some(DateRange::new(start, end))
    })
}

fn single_date(text: &str) -> Option<DateRange> {
    let by_name = SINGLE_DATE
        .captures(text)
        .and_then(|caps| named_date(&caps, 1, 2, 3));
    by_name
        .or_else(|| {
            let caps = SINGLE_NUMERIC.captures(text)?;
            numeric_date(&caps, 1, 2, 3)
        })
        .map(DateRange::single)
}

fn month_year(text: &str) -> Option<DateRange> {
    let caps = MONTH_YEAR.captures(text)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let year = number::<i32>(&caps, 2)?;
    DateRange::month(year, month)
}

fn iso_date(text: &str) -> Option<DateRange> {
    let caps = ISO_DATE.captures(text)?;
    numeric_date(&caps, 3, 2, 1).map(DateRange::single)
}

// === 捕获组辅助函数 ===

fn number<T: std::str::FromStr>(caps: &Captures, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

/// 日 + 月份名 + 年
fn named_date(caps: &Captures, day: usize, month: usize, year: usize) -> Option<NaiveDate> {
    let month = month_number(caps.get(month)?.as_str())?;
    NaiveDate::from_ymd_opt(number(caps, year)?, month, number(caps, day)?)
}

/// 日 + 月份数字 + 年
fn numeric_date(caps: &Captures, day: usize, month: usize, year: usize) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(number(caps, year)?, number(caps, month)?, number(caps, day)?)
}

fn hm(caps: &Captures, hour: usize, minute: Option<usize>) -> Option<NaiveTime> {
    let minute = match minute {
        Some(i) => number(caps, i)?,
        None => 0,
    };
    NaiveTime::from_hms_opt(number(caps, hour)?, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 11, 29)
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(parse_dates("прирост за вчера", today()), Some(DateRange::single(date(2025, 11, 28))));
        assert_eq!(parse_dates("сегодня", today()), Some(DateRange::single(today())));
        assert_eq!(parse_dates("завтра", today()), Some(DateRange::single(date(2025, 11, 30))));
        assert_eq!(
            parse_dates("новые просмотры за неделю", today()),
            Some(DateRange::new(date(2025, 11, 22), today()))
        );
        assert_eq!(
            parse_dates("за последний месяц", today()),
            Some(DateRange::new(date(2025, 10, 30), today()))
        );
    }

    #[test]
    fn test_explicit_ranges() {
        assert_eq!(
            parse_dates("с 1 ноября 2025 по 5 ноября 2025", today()),
            Some(DateRange::new(date(2025, 11, 1), date(2025, 11, 5)))
        );
        assert_eq!(
            parse_dates("с 28 октября 2025 года по 3 ноября 2025", today()),
            Some(DateRange::new(date(2025, 10, 28), date(2025, 11, 3)))
        );
        assert_eq!(
            parse_dates("01.11.2025 - 05.11.2025", today()),
            Some(DateRange::new(date(2025, 11, 1), date(2025, 11, 5)))
        );
        assert_eq!(
            parse_dates("от 3 до 7 июня 2025", today()),
            Some(DateRange::new(date(2025, 6, 3), date(2025, 6, 7)))
        );
        assert_eq!(
            parse_dates("10-12 мая 2025", today()),
            Some(DateRange::new(date(2025, 5, 10), date(2025, 5, 12)))
        );
    }

    #[test]
    fn test_single_dates() {
        assert_eq!(parse_dates("28 ноября 2025", today()), Some(DateRange::single(date(2025, 11, 28))));
        assert_eq!(parse_dates("за 28.11.2025", today()), Some(DateRange::single(date(2025, 11, 28))));
        assert_eq!(parse_dates("на 2025-11-28", today()), Some(DateRange::single(date(2025, 11, 28))));
    }

    #[test]
    fn test_month_year_normalization() {
        assert_eq!(
            parse_dates("в июне 2025", today()),
            Some(DateRange::new(date(2025, 6, 1), date(2025, 6, 30)))
        );
        assert_eq!(
            parse_dates("в феврале 2024", today()),
            Some(DateRange::new(date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            parse_dates("за ноябрь 2025", today()),
            Some(DateRange::new(date(2025, 11, 1), date(2025, 11, 30)))
        );
        assert_eq!(
            parse_dates("марта 2023 года", today()),
            Some(DateRange::new(date(2023, 3, 1), date(2023, 3, 31)))
        );
    }

    #[test]
    fn test_invalid_day_falls_through_to_later_stage() {
        // 11 月没有 31 日：单日写法失败，落到"月份+年份"
        assert_eq!(
            parse_dates("31 ноября 2025", today()),
            Some(DateRange::new(date(2025, 11, 1), date(2025, 11, 30)))
        );
        assert_eq!(parse_dates("2025-02-30", today()), None);
        assert_eq!(parse_dates("сколько всего видео", today()), None);
    }

    #[test]
    fn test_single_date_round_trip() {
        let genitive = &MONTHS[..12];
        let mut day = date(2024, 1, 1);
        while day <= date(2025, 12, 31) {
            let (name, _) = genitive[chrono::Datelike::month0(&day) as usize];
            let text = format!("{} {} {}", chrono::Datelike::day(&day), name, chrono::Datelike::year(&day));
            assert_eq!(parse_dates(&text, today()), Some(DateRange::single(day)), "{text}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_same_month_range_round_trip() {
        let (name, _) = MONTHS[1];
        for first in 1..=29u32 {
            for last in first..=29u32 {
                let text = format!("с {first} по {last} {name} 2024");
                assert_eq!(
                    parse_dates(&text, today()),
                    Some(DateRange::new(date(2024, 2, first), date(2024, 2, last))),
                    "{text}"
                );
            }
        }
    }

    #[test]
    fn test_date_period_whole_year() {
        assert_eq!(
            parse_date_period("за 2024 год", today()),
            Some(DateRange::new(date(2024, 1, 1), date(2024, 12, 31)))
        );
        assert_eq!(parse_date_period("за 2024", today()), None);
        assert_eq!(parse_year("в 2023"), DateRange::year(2023));
    }

    #[test]
    fn test_time_ranges() {
        assert_eq!(parse_time_range("с 10:00 до 15:30"), Some((time(10, 0), time(15, 30))));
        assert_eq!(parse_time_range("с 10 до 15 часов"), Some((time(10, 0), time(15, 0))));
        assert_eq!(parse_time_range("с 9 по 18"), Some((time(9, 0), time(18, 0))));
        assert_eq!(parse_time_range("с 25:00 до 26:00"), None);
        assert_eq!(parse_time_range("с 1 по 5 ноября 2025"), None);
        assert_eq!(parse_time_range("вчера"), None);
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_number("ноября"), Some(11));
        assert_eq!(month_number("июне"), Some(6));
        assert_eq!(month_number("май"), Some(5));
        assert_eq!(month_number("понедельник"), None);
        assert!(mentions_month("в марте"));
        assert!(!mentions_month("сколько всего видео"));
    }
}
