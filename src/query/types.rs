// query/types.rs - 意图与参数类型定义
//! 定义解析结果的结构：封闭的意图集合，以及每个意图各自的参数记录

use std::fmt;

use chrono::{Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// `videos_by_views` 未给出数字时的默认阈值
pub const DEFAULT_MIN_VIEWS: u64 = 100_000;

/// `videos_by_creator_with_views` 未给出数字时的默认阈值
pub const DEFAULT_CREATOR_MIN_VIEWS: u64 = 10_000;

/// 查询意图（封闭集合）
///
/// 声明顺序即加权分类器的平分裁决顺序：分数相同时取靠前者。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// 系统中的视频总数
    TotalVideos,
    /// 某创作者的视频数（可限定发布日期）
    VideosByCreator,
    /// 播放量超过阈值的视频数
    VideosByViews,
    /// 某日全部视频的播放量增量之和
    TotalGrowth,
    /// 某日获得新播放的不同视频数
    UniqueGrowth,
    /// 全部视频在某时间段内的播放量总和
    TotalViewsAllVideosPeriod,
    /// 某时间段内的播放量总和（可带创作者时段窗口）
    TotalViewsPeriod,
    /// 播放量增量为负的统计快照数
    NegativeViewsSnapshots,
    /// 某创作者播放量超过阈值的视频数
    VideosByCreatorWithViews,
    /// 无法识别
    Unknown,
}

impl Intent {
    pub const COUNT: usize = 10;

    /// 全部意图，按声明顺序
    pub const ALL: [Intent; Intent::COUNT] = [
        Intent::TotalVideos,
        Intent::VideosByCreator,
        Intent::VideosByViews,
        Intent::TotalGrowth,
        Intent::UniqueGrowth,
        Intent::TotalViewsAllVideosPeriod,
        Intent::TotalViewsPeriod,
        Intent::NegativeViewsSnapshots,
        Intent::VideosByCreatorWithViews,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TotalVideos => "total_videos",
            Intent::VideosByCreator => "videos_by_creator",
            Intent::VideosByViews => "videos_by_views",
            Intent::TotalGrowth => "total_growth",
            Intent::UniqueGrowth => "unique_growth",
            Intent::TotalViewsAllVideosPeriod => "total_views_all_videos_period",
            Intent::TotalViewsPeriod => "total_views_period",
            Intent::NegativeViewsSnapshots => "negative_views_snapshots",
            Intent::VideosByCreatorWithViews => "videos_by_creator_with_views",
            Intent::Unknown => "unknown",
        }
    }

    /// 在 `ALL` 中的位置
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 闭区间日期范围，保证 `start_date <= end_date`
///
/// 字段不公开，只能经由 `new` / `single` / `month` / `year` 构造。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateRange {
    /// 构造范围，端点顺序颠倒时自动交换
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start_date: a, end_date: b }
        } else {
            Self { start_date: b, end_date: a }
        }
    }

    /// 单日范围
    pub fn single(date: NaiveDate) -> Self {
        Self { start_date: date, end_date: date }
    }

    /// 整月：当月第一天到最后一天（考虑闰年）
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self::new(first, last))
    }

    /// 整年
    pub fn year(year: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self::new(first, last))
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// 创作者在某一天内的时段窗口（"с 10:00 до 15:00"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatorWindow {
    pub creator_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// 每个意图各自的参数记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum QueryParams {
    TotalVideos,
    VideosByCreator {
        creator_id: String,
        /// None 表示不限
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    VideosByViews {
        min_views: u64,
    },
    TotalGrowth {
        date: NaiveDate,
    },
    UniqueGrowth {
        date: NaiveDate,
    },
    TotalViewsAllVideosPeriod {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    TotalViewsPeriod {
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<CreatorWindow>,
    },
    NegativeViewsSnapshots,
    VideosByCreatorWithViews {
        creator_id: String,
        min_views: u64,
    },
    Unknown {
        /// 原始问题的回显
        query: String,
    },
}

impl QueryParams {
    pub fn intent(&self) -> Intent {
        match self {
            QueryParams::TotalVideos => Intent::TotalVideos,
            QueryParams::VideosByCreator { .. } => Intent::VideosByCreator,
            QueryParams::VideosByViews { .. } => Intent::VideosByViews,
            QueryParams::TotalGrowth { .. } => Intent::TotalGrowth,
            QueryParams::UniqueGrowth { .. } => Intent::UniqueGrowth,
            QueryParams::TotalViewsAllVideosPeriod { .. } => Intent::TotalViewsAllVideosPeriod,
            QueryParams::TotalViewsPeriod { .. } => Intent::TotalViewsPeriod,
            QueryParams::NegativeViewsSnapshots => Intent::NegativeViewsSnapshots,
            QueryParams::VideosByCreatorWithViews { .. } => Intent::VideosByCreatorWithViews,
            QueryParams::Unknown { .. } => Intent::Unknown,
        }
    }

    /// 全部视频在时间段内的播放量总和
    pub fn all_videos_period(period: DateRange) -> Self {
        QueryParams::TotalViewsAllVideosPeriod {
            start_date: period.start_date(),
            end_date: period.end_date(),
        }
    }

    /// 时间段内的播放量总和
    pub fn views_period(period: DateRange, window: Option<CreatorWindow>) -> Self {
        QueryParams::TotalViewsPeriod {
            start_date: period.start_date(),
            end_date: period.end_date(),
            window,
        }
    }
}

/// 解析结果：每个输入生成一次，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub intent: Intent,
    pub params: QueryParams,
    /// 原始输入（未做大小写处理）
    pub original_query: String,
}

impl QueryResult {
    pub fn new(params: QueryParams, original_query: impl Into<String>) -> Self {
        Self {
            intent: params.intent(),
            params,
            original_query: original_query.into(),
        }
    }

    pub fn unknown(original_query: impl Into<String>) -> Self {
        let original_query = original_query.into();
        Self::new(
            QueryParams::Unknown { query: original_query.clone() },
            original_query,
        )
    }

    pub fn is_unknown(&self) -> bool {
        self.intent == Intent::Unknown
    }
}
