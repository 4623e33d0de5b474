// engine/store.rs - 统计数据源接口
//! 问答引擎只依赖这个 trait，具体的数据库实现由调用方提供

use chrono::{NaiveDate, NaiveTime};

/// 数据源错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 视频统计数据源
///
/// 每个方法对应一类意图，返回单个计数或求和结果。
pub trait StatsStore {
    /// 视频总数
    fn total_videos(&self) -> StoreResult<i64>;

    /// 某创作者的视频数，可按发布日期（含两端）限定
    fn videos_by_creator(
        &self,
        creator_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> StoreResult<i64>;

    /// 最终播放量大于 `min_views` 的视频数
    fn videos_with_views_above(&self, min_views: u64) -> StoreResult<i64>;

    /// 某创作者最终播放量大于 `min_views` 的视频数
    fn videos_by_creator_with_views(&self, creator_id: &str, min_views: u64) -> StoreResult<i64>;

    /// 发布于 [start_date, end_date] 的全部视频的播放量总和
    fn total_views_for_period(&self, start_date: NaiveDate, end_date: NaiveDate) -> StoreResult<i64>;

    /// 某创作者的视频在 `date` 当天 [start_time, end_time] 内的正向播放增量之和
    fn creator_views_growth_in_window(
        &self,
        creator_id: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> StoreResult<i64>;

    /// 某日全部视频的播放增量之和
    fn total_views_growth_on_date(&self, date: NaiveDate) -> StoreResult<i64>;

    /// 某日获得新播放的不同视频数
    fn unique_videos_with_growth_on_date(&self, date: NaiveDate) -> StoreResult<i64>;

    /// 播放增量为负的快照数
    fn negative_views_snapshots(&self) -> StoreResult<i64>;
}
