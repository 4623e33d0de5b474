// query/cascade.rs - 有序规则级联
//! 固定优先级的精确规则表，先于加权打分执行
//!
//! 每条规则由谓词和参数抽取函数组成。按表中顺序尝试，
//! 第一条谓词成立且抽取成功的规则给出结果；谓词成立但抽取失败时继续尝试下一条。

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::calendar::{parse_date_period, parse_dates, parse_time_range, parse_year};
use super::entities::{
    extract_creator_id, extract_creator_reference, extract_view_threshold, strip_creator_id,
    VIEW_THRESHOLD_FLOOR,
};
use super::types::{
    CreatorWindow, Intent, QueryParams, QueryResult, DEFAULT_MIN_VIEWS,
};

/// 级联中的一条规则
pub struct Rule {
    pub name: &'static str,
    pub intent: Intent,
    matches: fn(&str, NaiveDate) -> bool,
    extract: fn(&str, NaiveDate) -> Option<QueryParams>,
}

impl Rule {
    /// 谓词成立时执行抽取
    pub fn try_match(&self, text: &str, today: NaiveDate) -> Option<QueryParams> {
        if (self.matches)(text, today) {
            (self.extract)(text, today)
        } else {
            None
        }
    }
}

/// 规则表，按优先级从高到低
static RULES: [Rule; 10] = [
    Rule {
        name: "all_videos_views_for_period",
        intent: Intent::TotalViewsAllVideosPeriod,
        matches: all_videos_period_matches,
        extract: all_videos_period_extract,
    },
    Rule {
        name: "creator_views_in_time_window",
        intent: Intent::TotalViewsPeriod,
        matches: creator_window_matches,
        extract: creator_window_extract,
    },
    Rule {
        name: "views_for_period",
        intent: Intent::TotalViewsPeriod,
        matches: views_period_matches,
        extract: views_period_extract,
    },
    Rule {
        name: "negative_views_snapshots",
        intent: Intent::NegativeViewsSnapshots,
        matches: negative_snapshots_matches,
        extract: negative_snapshots_extract,
    },
    Rule {
        name: "creator_videos_above_views",
        intent: Intent::VideosByCreatorWithViews,
        matches: creator_with_views_matches,
        extract: creator_with_views_extract,
    },
    Rule {
        name: "total_videos",
        intent: Intent::TotalVideos,
        matches: total_videos_matches,
        extract: total_videos_extract,
    },
    Rule {
        name: "creator_videos",
        intent: Intent::VideosByCreator,
        matches: creator_videos_matches,
        extract: creator_videos_extract,
    },
    Rule {
        name: "videos_above_views",
        intent: Intent::VideosByViews,
        matches: videos_by_views_matches,
        extract: videos_by_views_extract,
    },
    Rule {
        name: "total_growth",
        intent: Intent::TotalGrowth,
        matches: total_growth_matches,
        extract: total_growth_extract,
    },
    Rule {
        name: "unique_growth",
        intent: Intent::UniqueGrowth,
        matches: unique_growth_matches,
        extract: unique_growth_extract,
    },
];

/// 规则表（只读）
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// 对原始输入运行级联
pub fn resolve(input: &str, today: NaiveDate) -> Option<QueryResult> {
    let normalized = super::parser::normalize(input);
    resolve_normalized(&normalized, input, today)
}

/// 对已小写的文本运行级联
pub(crate) fn resolve_normalized(text: &str, original: &str, today: NaiveDate) -> Option<QueryResult> {
    RULES.iter().find_map(|rule| {
        let params = rule.try_match(text, today)?;
        debug!(rule = rule.name, intent = %rule.intent, "cascade rule matched");
        Some(QueryResult::new(params, original))
    })
}

// ============== 词表 ==============

const TOTAL_VIEWS_PHRASES: &[&str] = &[
    "суммарное количество просмотров",
    "суммарное число просмотров",
    "сколько всего просмотров",
    "сумма просмотров",
    "набрали все видео",
    "всего просмотров набрали",
];

const ALL_VIDEOS_PHRASES: &[&str] = &["все видео", "всех видео", "любого автора", "любого креатора"];

const WINDOW_PHRASES: &[&str] = &[
    "просмотров суммарно выросли",
    "суммарно выросли все видео",
    "сложить изменения просмотров",
    "изменения просмотров между замерами",
    "замерами попадающими в этот интервал",
];

const TOTAL_WORDS: &[&str] = &["суммарное", "сумма", "общее", "всего", "набрали все", "все видео"];

const VIEWS_WORDS: &[&str] = &["просмотров", "просмотры"];

const VIEWS_OR_GAINED: &[&str] = &["просмотров", "просмотры", "набрали", "набрало"];

const COMPARISON_WORDS: &[&str] = &["больше", "более", "свыше", ">"];

const GROWTH_WORDS: &[&str] = &["вырос", "прирост", "прибавил"];

const NOT_PLAIN_CREATOR: &[&str] = &["уникальн", "разных", "новые", "прирост", "вырос"];

const NEGATIVE_WORDS: &[&str] = &[
    "отрицательн",
    "уменьшилось",
    "стало меньше",
    "по сравнению с предыдущим",
    "просмотров за час",
    "замеров статистики",
    "количество просмотров стало меньше",
];

const SNAPSHOT_WORDS: &[&str] = &["замеров", "замеры", "снапшотов", "статистик"];

const UNIQUENESS_WORDS: &[&str] = &["уникальн", "разных", "разные", "какие"];

const UNIQUE_CUES: &[&str] = &["уникальн", "разных", "разные", "какие", "получали"];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

// ============== 正则 ==============

static TOTAL_VIDEOS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:сколько всего видео|сколько видео в системе|общее количество видео",
        r"|всего видео\??$|количество всех видео|сколько роликов в системе",
        r"|суммарное количество видео|сколько у вас видео|сколько всего роликов|общее число видео)",
    ))
    .unwrap()
});

static NEGATIVE_PATTERNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"сколько всего есть замеров статистики.*отрицательн",
        r"|замеров.*отрицательн.*просмотров",
        r"|просмотров за час.*отрицательн",
        r"|количество просмотров стало меньше",
        r"|по сравнению с предыдущим.*меньше",
    ))
    .unwrap()
});

static VIDEOS_WITH_N_VIEWS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"видео\s+с\s+(\d+)\s+просмотр").unwrap()
});

static VIEWS_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"сколько видео.*просмотров|видео.*просмотров.*сколько").unwrap()
});

static GROWTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"на сколько просмотров.*выросли",
        r"|суммарный прирост просмотров",
        r"|сумма просмотров.*выросла",
        r"|прирост просмотров",
        r"|сколько просмотров.*прибавилось",
        r"|общий прирост.*просмотров",
        r"|насколько.*выросли.*просмотры",
        r"|выросло.*просмотров.*сколько",
        r"|прирост.*за.*вчера",
        r"|прирост.*за.*сегодня",
        r"|прирост.*за.*неделю",
        r"|новые просмотры.*за.*недел",
        r"|просмотры.*за.*недел",
        r"|сколько.*просмотров.*за.*недел",
    ))
    .unwrap()
});

static UNIQUE_GROWTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"сколько разных видео.*просмотры",
        r"|уникальных видео.*новые просмотры",
        r"|разных видео.*получали просмотры",
        r"|сколько видео.*новые просмотры",
        r"|видео.*получало.*просмотры",
        r"|какие видео.*просмотры",
        r"|уникальные видео.*просмотры",
        r"|разные видео.*просмотры",
        r"|видео.*получали.*новые",
        r"|новые просмотры.*видео",
        r"|какие.*видео.*просмотры",
        r"|видео.*получали.*просмотры",
    ))
    .unwrap()
});

// ============== 规则实现 ==============

fn first_date_or(text: &str, today: NaiveDate) -> NaiveDate {
    parse_dates(text, today).map_or(today, |range| range.start_date())
}

// 1. 全部视频在时间段内的播放量总和
fn all_videos_period_matches(text: &str, today: NaiveDate) -> bool {
    let about_all = contains_any(text, ALL_VIDEOS_PHRASES)
        || !(text.contains("креатора") || text.contains("автора") || text.contains("id"));
    contains_any(text, TOTAL_VIEWS_PHRASES) && about_all && parse_dates(text, today).is_some()
}

fn all_videos_period_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    parse_dates(text, today).map(QueryParams::all_videos_period)
}

// 2. 某创作者在某日某时段内的播放量增长
fn creator_window_matches(text: &str, today: NaiveDate) -> bool {
    contains_any(text, WINDOW_PHRASES)
        && parse_time_range(text).is_some()
        && extract_creator_id(text).is_some()
        && parse_dates(text, today).is_some()
}

fn creator_window_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    let creator_id = extract_creator_id(text)?;
    let period = parse_dates(text, today)?;
    let (start_time, end_time) = parse_time_range(text)?;
    Some(QueryParams::views_period(
        period,
        Some(CreatorWindow { creator_id, start_time, end_time }),
    ))
}

// 3. 时间段内的播放量总和
fn views_period_matches(text: &str, _today: NaiveDate) -> bool {
    contains_any(text, TOTAL_WORDS) && contains_any(text, VIEWS_WORDS) && !contains_any(text, GROWTH_WORDS)
}

fn views_period_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    let period = parse_date_period(text, today).or_else(|| {
        if text.contains("суммарное количество просмотров") {
            parse_year(text)
        } else {
            None
        }
    })?;
    Some(QueryParams::views_period(period, None))
}

// 4. 负增长快照
fn negative_snapshots_matches(text: &str, _today: NaiveDate) -> bool {
    NEGATIVE_PATTERNS.is_match(text)
        || (contains_any(text, NEGATIVE_WORDS)
            && contains_any(text, SNAPSHOT_WORDS)
            && contains_any(text, VIEWS_WORDS))
}

fn negative_snapshots_extract(_text: &str, _today: NaiveDate) -> Option<QueryParams> {
    Some(QueryParams::NegativeViewsSnapshots)
}

// 5. 某创作者播放量超过阈值的视频
fn creator_with_views_matches(text: &str, _today: NaiveDate) -> bool {
    if extract_creator_id(text).is_none() {
        return false;
    }
    let rest = strip_creator_id(text);
    contains_any(&rest, VIEWS_OR_GAINED) && contains_any(&rest, COMPARISON_WORDS)
}

fn creator_with_views_extract(text: &str, _today: NaiveDate) -> Option<QueryParams> {
    Some(QueryParams::VideosByCreatorWithViews {
        creator_id: extract_creator_id(text)?,
        min_views: extract_view_threshold(text)?,
    })
}

// 6. 视频总数（锚定句首）
fn total_videos_matches(text: &str, _today: NaiveDate) -> bool {
    TOTAL_VIDEOS.is_match(text)
}

fn total_videos_extract(_text: &str, _today: NaiveDate) -> Option<QueryParams> {
    Some(QueryParams::TotalVideos)
}

// 7. 某创作者的视频数
fn creator_videos_matches(text: &str, _today: NaiveDate) -> bool {
    let compares_views = contains_any(text, VIEWS_OR_GAINED) && contains_any(text, COMPARISON_WORDS);
    !compares_views && !contains_any(text, NOT_PLAIN_CREATOR)
}

fn creator_videos_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    let creator_id = extract_creator_reference(text)?;
    let period = parse_dates(text, today);
    Some(QueryParams::VideosByCreator {
        creator_id,
        start_date: period.map(|range| range.start_date()),
        end_date: period.map(|range| range.end_date()),
    })
}

// 8. 播放量超过阈值的视频（不含创作者 ID）
fn videos_by_views_matches(text: &str, _today: NaiveDate) -> bool {
    extract_creator_id(text).is_none()
}

fn videos_by_views_extract(text: &str, _today: NaiveDate) -> Option<QueryParams> {
    let explicit = if text.contains("просмотр") {
        extract_view_threshold(text).or_else(|| {
            VIDEOS_WITH_N_VIEWS
                .captures(text)
                .and_then(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
                .filter(|&value| value >= VIEW_THRESHOLD_FLOOR)
        })
    } else {
        None
    };

    let min_views = match explicit {
        Some(value) => value,
        None if VIEWS_QUESTION.is_match(text) => DEFAULT_MIN_VIEWS,
        None => return None,
    };
    Some(QueryParams::VideosByViews { min_views })
}

// 9. 全部视频的播放增量
fn total_growth_matches(text: &str, _today: NaiveDate) -> bool {
    // 出现去重用语时交给第 10 条
    GROWTH.is_match(text) && !contains_any(text, UNIQUENESS_WORDS)
}

fn total_growth_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    Some(QueryParams::TotalGrowth { date: first_date_or(text, today) })
}

// 10. 获得新播放的不同视频数
fn unique_growth_matches(text: &str, _today: NaiveDate) -> bool {
    if !UNIQUE_GROWTH.is_match(text) {
        return false;
    }
    // "новые просмотры за неделю" 没有去重含义时属于总增长
    let weekly_new_views = text.contains("новые просмотры") && text.contains("за неделю");
    !weekly_new_views || contains_any(text, UNIQUENESS_WORDS)
}

fn unique_growth_extract(text: &str, today: NaiveDate) -> Option<QueryParams> {
    let date = match parse_dates(text, today) {
        Some(range) => range.start_date(),
        None if contains_any(text, UNIQUE_CUES) => today,
        None => return None,
    };
    Some(QueryParams::UniqueGrowth { date })
}
