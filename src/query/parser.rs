// query/parser.rs - 意图解析器
//! 把自然语言问题解析为意图 + 参数
//!
//! 流程:
//! - 输入只做一次 trim + 小写
//! - 有序规则级联，第一条命中的规则生效
//! - 都未命中时交给加权关键词分类器
//!
//! 相对日期（"вчера"、"за неделю"）按参考日期计算，参考日期默认取本地时钟，
//! 可以通过 `with_clock` 替换，或在 `parse_on` 中直接给出。

use chrono::{Local, NaiveDate};

use super::cascade;
use super::fallback;
use super::types::QueryResult;
use crate::config::ClassifierConfig;

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// 意图解析器
pub struct IntentParser {
    classifier: ClassifierConfig,
    /// 参考日期来源（可选）
    clock: Option<Clock>,
}

impl IntentParser {
    /// 创建新的解析器
    pub fn new() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            clock: None,
        }
    }

    /// 设置分类器阈值
    pub fn with_config(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// 设置参考日期来源
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// 当前参考日期
    pub fn today(&self) -> NaiveDate {
        match &self.clock {
            Some(clock) => clock(),
            None => Local::now().date_naive(),
        }
    }

    /// 以当前参考日期解析
    pub fn parse(&self, input: &str) -> QueryResult {
        self.parse_on(input, self.today())
    }

    /// 以给定参考日期解析
    pub fn parse_on(&self, input: &str, today: NaiveDate) -> QueryResult {
        let text = normalize(input);
        cascade::resolve_normalized(&text, input, today).unwrap_or_else(|| {
            fallback::classify_normalized(&text, input, today, &self.classifier)
        })
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 去掉首尾空白并转小写
pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::{Intent, QueryParams, DEFAULT_MIN_VIEWS};

    const ID: &str = "aca1061a9d324ecf8c3fa2bb32d7be63";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parser() -> IntentParser {
        IntentParser::new().with_clock(|| NaiveDate::from_ymd_opt(2025, 11, 29).unwrap())
    }

    #[test]
    fn test_parse_total_videos() {
        let result = parser().parse("Сколько всего видео");
        assert_eq!(result.intent, Intent::TotalVideos);
        assert_eq!(result.original_query, "Сколько всего видео");
    }

    #[test]
    fn test_parse_creator_videos() {
        let result = parser().parse("Видео креатора id aca1061a9d324ecf8c3fa2bb32d7be63");
        assert_eq!(
            result.params,
            QueryParams::VideosByCreator { creator_id: ID.to_string(), start_date: None, end_date: None }
        );
    }

    #[test]
    fn test_parse_views_threshold() {
        let result = parser().parse("Видео с >250000 просмотров");
        assert_eq!(result.params, QueryParams::VideosByViews { min_views: 250_000 });

        let result = parser().parse("Сколько видео с большим числом просмотров?");
        assert_eq!(result.params, QueryParams::VideosByViews { min_views: DEFAULT_MIN_VIEWS });
    }

    #[test]
    fn test_parse_growth_yesterday() {
        let result = parser().parse("Прирост просмотров за вчера");
        assert_eq!(result.params, QueryParams::TotalGrowth { date: date(2025, 11, 28) });
    }

    #[test]
    fn test_parse_author_without_id() {
        let result = parser().parse("Сколько видео у автора");
        assert!(result.is_unknown());
        assert_eq!(result.params, QueryParams::Unknown { query: "Сколько видео у автора".to_string() });
    }

    #[test]
    fn test_parse_new_views_for_week() {
        assert_eq!(parser().parse("Новые просмотры за неделю").intent, Intent::TotalGrowth);
    }

    #[test]
    fn test_parse_unique_videos_for_week() {
        let result = parser().parse("Сколько уникальных видео получали просмотры за неделю");
        assert_eq!(result.params, QueryParams::UniqueGrowth { date: date(2025, 11, 22) });
    }

    #[test]
    fn test_parse_bare_year_without_views_is_unknown() {
        assert!(parser().parse("Сколько видео вышло в 2025").is_unknown());
    }

    #[test]
    fn test_parse_creator_growth_falls_back_to_creator_videos() {
        let result = parser().parse(&format!("Сколько видео у креатора с id {ID} получили прирост"));
        assert_eq!(
            result.params,
            QueryParams::VideosByCreator { creator_id: ID.to_string(), start_date: None, end_date: None }
        );
    }

    #[test]
    fn test_parse_scenario_table() {
        let cases = [
            ("Прирост просмотров за вчера", Intent::TotalGrowth),
            ("Сколько всего видео", Intent::TotalVideos),
            ("Видео с более 50000 просмотров", Intent::VideosByViews),
            ("Уникальные видео с новыми просмотрами", Intent::UniqueGrowth),
            ("Видео креатора id aca1061a9d324ecf8c3fa2bb32d7be63", Intent::VideosByCreator),
            ("Прирост за сегодня", Intent::TotalGrowth),
            ("Сколько разных видео получали просмотры вчера", Intent::UniqueGrowth),
            ("Видео с >100000 просмотров", Intent::VideosByViews),
            ("Ролики автора с id aca1061a9d324ecf8c3fa2bb32d7be63", Intent::VideosByCreator),
            ("Общий прирост просмотров", Intent::TotalGrowth),
            ("Уникальные ролики с просмотрами", Intent::UniqueGrowth),
            ("Разные видео получали просмотры сегодня", Intent::UniqueGrowth),
            ("На сколько выросли просмотры вчера", Intent::TotalGrowth),
            ("Сколько видео у автора", Intent::Unknown),
            ("Видео с просмотрами больше 1000", Intent::VideosByViews),
            ("Новые просмотры за неделю", Intent::TotalGrowth),
            ("Сколько всего роликов", Intent::TotalVideos),
            ("Креатор с id aca1061a9d324ecf8c3fa2bb32d7be63", Intent::VideosByCreator),
            ("Уникальные видео", Intent::UniqueGrowth),
            ("Прирост", Intent::TotalGrowth),
        ];
        let parser = parser();
        for (input, expected) in cases {
            assert_eq!(parser.parse(input).intent, expected, "{input}");
        }
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        let parser = parser();
        let plain = parser.parse("сколько всего видео");
        let noisy = parser.parse("   СКОЛЬКО ВСЕГО ВИДЕО  ");
        assert_eq!(plain.params, noisy.params);
        assert_eq!(noisy.original_query, "   СКОЛЬКО ВСЕГО ВИДЕО  ");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = parser();
        let input = "Сколько видео у креатора с id aca1061a9d324ecf8c3fa2bb32d7be63 набрали больше 10 000 просмотров?";
        let first = parser.parse(input);
        for _ in 0..5 {
            assert_eq!(parser.parse(input), first);
        }
    }

    #[test]
    fn test_parse_on_explicit_reference_date() {
        let result = IntentParser::new().parse_on("Прирост за сегодня", date(2024, 2, 29));
        assert_eq!(result.params, QueryParams::TotalGrowth { date: date(2024, 2, 29) });
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IntentParser>();
    }
}
