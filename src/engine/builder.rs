// engine/builder.rs - 问答引擎构建器
//! 使用 Builder 模式构建 AnswerEngine

use chrono::NaiveDate;

use crate::config::ClassifierConfig;
use crate::query::IntentParser;

use super::core::{AnswerEngine, EngineError, EngineResult};
use super::store::StatsStore;

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// 问答引擎构建器
pub struct AnswerEngineBuilder<S> {
    config: Option<ClassifierConfig>,
    clock: Option<Clock>,
    store: Option<S>,
}

impl<S> Default for AnswerEngineBuilder<S> {
    fn default() -> Self {
        Self {
            config: None,
            clock: None,
            store: None,
        }
    }
}

impl<S: StatsStore> AnswerEngineBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置分类器阈值（缺省使用全局配置）
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = Some(config);
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

    /// 设置数据源
    pub fn with_store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// 构建问答引擎
    pub fn build(self) -> EngineResult<AnswerEngine<S>> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Config("Missing stats store".to_string()))?;

        let config = self
            .config
            .unwrap_or_else(|| crate::config::CONFIG.classifier.clone());

        let mut parser = IntentParser::new().with_config(config);
        if let Some(clock) = self.clock {
            parser = parser.with_clock(clock);
        }

        Ok(AnswerEngine { parser, store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::StoreResult;
    use chrono::NaiveTime;

    /// 所有查询都返回 0 的数据源
    struct ZeroStore;

    impl StatsStore for ZeroStore {
        fn total_videos(&self) -> StoreResult<i64> { Ok(0) }
        fn videos_by_creator(&self, _: &str, _: Option<NaiveDate>, _: Option<NaiveDate>) -> StoreResult<i64> { Ok(0) }
        fn videos_with_views_above(&self, _: u64) -> StoreResult<i64> { Ok(0) }
        fn videos_by_creator_with_views(&self, _: &str, _: u64) -> StoreResult<i64> { Ok(0) }
        fn total_views_for_period(&self, _: NaiveDate, _: NaiveDate) -> StoreResult<i64> { Ok(0) }
        fn creator_views_growth_in_window(&self, _: &str, _: NaiveDate, _: NaiveTime, _: NaiveTime) -> StoreResult<i64> { Ok(0) }
        fn total_views_growth_on_date(&self, _: NaiveDate) -> StoreResult<i64> { Ok(0) }
        fn unique_videos_with_growth_on_date(&self, _: NaiveDate) -> StoreResult<i64> { Ok(0) }
        fn negative_views_snapshots(&self) -> StoreResult<i64> { Ok(0) }
    }

    #[test]
    fn test_builder() {
        let engine = AnswerEngineBuilder::new()
            .with_store(ZeroStore)
            .with_config(ClassifierConfig::default())
            .with_clock(|| NaiveDate::from_ymd_opt(2025, 11, 29).unwrap())
            .build()
            .unwrap();

        assert_eq!(engine.parser().today(), NaiveDate::from_ymd_opt(2025, 11, 29).unwrap());
        assert_eq!(engine.answer("Сколько всего видео").unwrap().answer, "0");
    }

    #[test]
    fn test_builder_requires_store() {
        let result = AnswerEngineBuilder::<ZeroStore>::new().build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
