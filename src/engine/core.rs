// engine/core.rs - 问答引擎核心
//! 解析问题，把结果分派给数据源，并渲染成单个数值回答

use std::time::Instant;

use tracing::{debug, info};

use crate::api::{AskRequest, AskResponse};
use crate::query::{IntentParser, QueryParams, QueryResult};

use super::store::{StatsStore, StoreError, StoreResult};

/// 问答引擎错误类型
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// 问答引擎
pub struct AnswerEngine<S> {
    pub(crate) parser: IntentParser,
    pub(crate) store: S,
}

impl<S: StatsStore> AnswerEngine<S> {
    pub fn parser(&self) -> &IntentParser {
        &self.parser
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 回答一个问题
    pub fn answer(&self, text: &str) -> EngineResult<AskResponse> {
        self.answer_request(&AskRequest::new(text))
    }

    /// 回答一个请求（可指定参考日期）
    pub fn answer_request(&self, request: &AskRequest) -> EngineResult<AskResponse> {
        let start = Instant::now();
        let today = request.reference_date.unwrap_or_else(|| self.parser.today());
        let result = self.parser.parse_on(&request.text, today);
        info!(intent = %result.intent, "question resolved");

        let response = self.answer_query(result)?;
        Ok(response.with_took(start.elapsed().as_millis() as u64))
    }

    /// 执行已解析的结果
    pub fn answer_query(&self, result: QueryResult) -> EngineResult<AskResponse> {
        match self.execute(&result.params)? {
            Some(value) => {
                debug!(intent = %result.intent, value, "store answered");
                Ok(AskResponse::answered(result, value))
            }
            None => {
                let hint = unknown_hint(&result.original_query);
                Ok(AskResponse::unanswered(result, hint))
            }
        }
    }

    fn execute(&self, params: &QueryParams) -> StoreResult<Option<i64>> {
        let store = &self.store;
        let value = match params {
            QueryParams::TotalVideos => store.total_videos()?,
            QueryParams::VideosByCreator { creator_id, start_date, end_date } => {
                store.videos_by_creator(creator_id, *start_date, *end_date)?
            }
            QueryParams::VideosByViews { min_views } => store.videos_with_views_above(*min_views)?,
            QueryParams::VideosByCreatorWithViews { creator_id, min_views } => {
                store.videos_by_creator_with_views(creator_id, *min_views)?
            }
            QueryParams::TotalViewsAllVideosPeriod { start_date, end_date } => {
                store.total_views_for_period(*start_date, *end_date)?
            }
            QueryParams::TotalViewsPeriod { start_date, end_date, window } => match window {
                // 时段窗口只针对单日
                Some(window) => store.creator_views_growth_in_window(
                    &window.creator_id,
                    *start_date,
                    window.start_time,
                    window.end_time,
                )?,
                None => store.total_views_for_period(*start_date, *end_date)?,
            },
            QueryParams::TotalGrowth { date } => store.total_views_growth_on_date(*date)?,
            QueryParams::UniqueGrowth { date } => store.unique_videos_with_growth_on_date(*date)?,
            QueryParams::NegativeViewsSnapshots => store.negative_views_snapshots()?,
            QueryParams::Unknown { .. } => return Ok(None),
        };
        Ok(Some(value))
    }
}

/// 无法识别时的提示
pub fn unknown_hint(original_query: &str) -> String {
    let mut hint = String::from(
        "Не удалось распознать запрос.\n\n\
         Попробуйте один из примеров:\n\
         • Сколько всего видео?\n\
         • Видео креатора id 123\n\
         • Видео с >50000 просмотров\n\
         • Прирост просмотров за вчера",
    );

    let text = original_query.to_lowercase();
    let suggestion = if text.contains("автор") || text.contains("креатор") {
        Some("Укажите ID креатора, например: 'Сколько видео у креатора с id abc123'")
    } else if text.contains("просмотр") {
        Some("Уточните запрос, например: 'Прирост просмотров за вчера' или 'Видео с более 10000 просмотров'")
    } else {
        None
    };
    if let Some(suggestion) = suggestion {
        hint.push_str("\n\n");
        hint.push_str(suggestion);
    }
    hint
}
