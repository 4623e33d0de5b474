// query/fallback.rs - 加权关键词分类器
//! 级联规则都未命中时使用的兜底分类
//!
//! 流程：按关键词权重打分 -> 修正规则 -> 取最高分（平分取 `Intent` 声明顺序靠前者）
//! -> 分数阈值 -> 参数抽取（缺少必需参数时降级为 Unknown）。

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::{parse_date_period, parse_dates, parse_year};
use super::entities::{extract_creator_id, extract_view_threshold, mentions_creator_id};
use super::types::{
    Intent, QueryParams, QueryResult, DEFAULT_CREATOR_MIN_VIEWS, DEFAULT_MIN_VIEWS,
};
use crate::config::ClassifierConfig;

/// 某个意图的关键词权重表
pub struct KeywordTable {
    pub intent: Intent,
    pub weights: &'static [(&'static str, u32)],
}

/// 各意图的关键词权重（子串匹配，每个关键词只计一次）
pub static KEYWORD_TABLES: [KeywordTable; 9] = [
    KeywordTable {
        intent: Intent::TotalVideos,
        weights: &[
            ("сколько", 3), ("всего", 3), ("всех", 2), ("общее", 2),
            ("роликов", 1), ("количество", 2), ("суммарное", 1), ("число", 1),
        ],
    },
    KeywordTable {
        intent: Intent::VideosByCreator,
        weights: &[
            ("креатор", 2), ("автор", 2), ("id", 4), ("у", 1),
            ("создатель", 2), ("user", 1), ("юзера", 1),
        ],
    },
    KeywordTable {
        intent: Intent::VideosByViews,
        weights: &[
            ("просмотров", 3), ("больше", 2), ("набрало", 2), ("превысило", 2),
            ("свыше", 2), ("более", 2), (">", 3), ("просмотрами", 2),
        ],
    },
    KeywordTable {
        intent: Intent::TotalGrowth,
        weights: &[
            ("прирост", 4), ("выросли", 3), ("прибавилось", 3), ("увеличились", 2),
            ("насколько", 1), ("суммарный", 3), ("общий", 2), ("за", 1),
            ("новые", 2), ("просмотры", 2),
        ],
    },
    KeywordTable {
        intent: Intent::UniqueGrowth,
        weights: &[
            ("уникальн", 5), ("разных", 5), ("разные", 5), ("новые", 1),
            ("получали", 3), ("получало", 3), ("отдельных", 2), ("различных", 2),
            ("какие", 3),
        ],
    },
    KeywordTable {
        intent: Intent::TotalViewsAllVideosPeriod,
        weights: &[
            ("суммарное", 3), ("суммарный", 3), ("сумма", 2), ("всех", 3),
            ("все", 3), ("любого", 2), ("любые", 2), ("опубликован", 2),
            ("набрали", 2), ("просмотров", 3), ("количество", 2),
        ],
    },
    KeywordTable {
        intent: Intent::TotalViewsPeriod,
        weights: &[
            ("суммарное", 8), ("сумма", 7), ("общее", 6), ("всего", 5),
            ("количество просмотров", 9), ("просмотров набрали", 8),
            ("все видео", 7), ("опубликован", 6), ("набрали", 7),
            ("январ", 4), ("феврал", 4), ("март", 4), ("апрел", 4),
            ("май", 4), ("июн", 4), ("июл", 4), ("август", 4),
            ("сентябр", 4), ("октябр", 4), ("ноябр", 4), ("декабр", 4),
            ("месяц", 5), ("2025", 4), ("2024", 4), ("года", 4),
        ],
    },
    KeywordTable {
        intent: Intent::NegativeViewsSnapshots,
        weights: &[
            ("отрицательн", 5), ("уменьшилось", 4), ("меньше", 3),
            ("замеров", 4), ("снапшотов", 4), ("статистики", 3),
            ("просмотров", 3), ("час", 2), ("предыдущим", 3),
            ("по сравнению", 3),
        ],
    },
    KeywordTable {
        intent: Intent::VideosByCreatorWithViews,
        weights: &[
            ("креатор", 2), ("автор", 2), ("id", 3), ("у", 1),
            ("просмотров", 3), ("больше", 2), ("набрали", 2), ("набрало", 2),
            ("просмотрами", 2), ("итоговой", 1), ("статистике", 1),
        ],
    },
];

const UNIQUENESS_WORDS: &[&str] = &["уникальн", "разных", "разные", "какие"];

/// 每个意图一个分数，下标为 `Intent::index()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    values: [u32; Intent::COUNT],
}

impl Scores {
    pub fn get(&self, intent: Intent) -> u32 {
        self.values[intent.index()]
    }

    pub fn add(&mut self, intent: Intent, weight: u32) {
        self.values[intent.index()] += weight;
    }

    pub fn set(&mut self, intent: Intent, value: u32) {
        self.values[intent.index()] = value;
    }

    /// 扣分，最低为 0
    pub fn subtract(&mut self, intent: Intent, weight: u32) {
        let slot = &mut self.values[intent.index()];
        *slot = slot.saturating_sub(weight);
    }

    pub fn total(&self) -> u32 {
        self.values.iter().sum()
    }

    /// 最高分意图；平分时取 `Intent::ALL` 中靠前的
    pub fn best(&self) -> (Intent, u32) {
        Intent::ALL
            .iter()
            .fold((Intent::ALL[0], self.values[0]), |best, &intent| {
                let score = self.get(intent);
                if score > best.1 { (intent, score) } else { best }
            })
    }
}

/// 计算关键词分数并应用修正规则
pub fn score(text: &str, today: NaiveDate) -> Scores {
    let mut scores = Scores::default();
    for table in KEYWORD_TABLES.iter() {
        for (keyword, weight) in table.weights {
            if text.contains(keyword) {
                scores.add(table.intent, *weight);
            }
        }
    }
    apply_overrides(text, today, &mut scores);
    scores
}

fn apply_overrides(text: &str, today: NaiveDate, scores: &mut Scores) {
    if text.contains("суммарное количество просмотров") {
        scores.add(Intent::TotalViewsPeriod, 10);
    }

    let mentions_creator = text.contains("креатора") || text.contains("автора");
    if text.contains("все видео") && !mentions_creator && parse_dates(text, today).is_some() {
        scores.add(Intent::TotalViewsAllVideosPeriod, 5);
    }

    if text.contains("креатора") && text.contains("просмотров") {
        let has_number = text
            .split_whitespace()
            .any(|word| word.chars().all(|c| c.is_ascii_digit()));
        if text.contains("больше") || has_number {
            scores.add(Intent::VideosByCreatorWithViews, 5);
            scores.subtract(Intent::VideosByCreator, 2);
        }
    }

    // "сколько видео у автора" 没有 ID 时无法回答
    if text.contains("сколько видео") && text.contains("у автора") && !mentions_creator_id(text) {
        scores.set(Intent::VideosByCreator, 0);
        scores.set(Intent::Unknown, 5);
    }

    if text.contains("новые просмотры")
        && text.contains("недел")
        && !UNIQUENESS_WORDS.iter().any(|word| text.contains(word))
    {
        scores.add(Intent::TotalGrowth, 5);
        scores.subtract(Intent::UniqueGrowth, 3);
    }

    if text.contains("сколько") && scores.total() < 3 {
        scores.add(Intent::Unknown, 3);
    }

    if scores.get(Intent::VideosByCreator) > 0 && !mentions_creator_id(text) && text.contains("автор") {
        scores.set(Intent::VideosByCreator, 0);
    }
}

/// 对原始输入运行兜底分类
pub fn classify(input: &str, today: NaiveDate, config: &ClassifierConfig) -> QueryResult {
    let normalized = super::parser::normalize(input);
    classify_normalized(&normalized, input, today, config)
}

/// 对已小写的文本运行兜底分类
pub(crate) fn classify_normalized(
    text: &str,
    original: &str,
    today: NaiveDate,
    config: &ClassifierConfig,
) -> QueryResult {
    let scores = score(text, today);
    let (best, best_score) = scores.best();
    debug!(?scores, %best, best_score, "fallback classifier scores");

    let required = match best {
        Intent::VideosByCreator => config.creator_min_score,
        _ => config.min_score,
    };
    if best == Intent::Unknown || best_score < required {
        return QueryResult::unknown(original);
    }

    match extract_params(best, text, today) {
        Some(params) => QueryResult::new(params, original),
        None => {
            debug!(intent = %best, "required parameter missing, demoted to unknown");
            QueryResult::unknown(original)
        }
    }
}

/// 按意图抽取参数；必需参数缺失时返回 None
fn extract_params(intent: Intent, text: &str, today: NaiveDate) -> Option<QueryParams> {
    let first_date = || parse_dates(text, today).map_or(today, |range| range.start_date());

    let params = match intent {
        Intent::TotalVideos => QueryParams::TotalVideos,
        Intent::VideosByCreator => {
            let period = parse_dates(text, today);
            QueryParams::VideosByCreator {
                creator_id: extract_creator_id(text)?,
                start_date: period.map(|range| range.start_date()),
                end_date: period.map(|range| range.end_date()),
            }
        }
        Intent::VideosByViews => QueryParams::VideosByViews {
            min_views: extract_view_threshold(text).unwrap_or(DEFAULT_MIN_VIEWS),
        },
        Intent::VideosByCreatorWithViews => QueryParams::VideosByCreatorWithViews {
            creator_id: extract_creator_id(text)?,
            min_views: extract_view_threshold(text).unwrap_or(DEFAULT_CREATOR_MIN_VIEWS),
        },
        Intent::TotalGrowth => QueryParams::TotalGrowth { date: first_date() },
        Intent::UniqueGrowth => QueryParams::UniqueGrowth { date: first_date() },
        Intent::TotalViewsAllVideosPeriod => {
            QueryParams::all_videos_period(parse_date_period(text, today)?)
        }
        Intent::TotalViewsPeriod => {
            // 单独的年份只在明确问播放量总和时才算时间段
            let period = parse_date_period(text, today).or_else(|| {
                if text.contains("суммарное количество просмотров") {
                    parse_year(text)
                } else {
                    None
                }
            })?;
            QueryParams::views_period(period, None)
        }
        Intent::NegativeViewsSnapshots => QueryParams::NegativeViewsSnapshots,
        Intent::Unknown => return None,
    };
    Some(params)
}
