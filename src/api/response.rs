// api/response.rs - 问答响应类型
//! 定义问题解析与回答的结构化响应类型

use serde::{Deserialize, Serialize};

use crate::query::{Intent, QueryParams, QueryResult};

/// 问答响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub intent: Intent,

    pub params: QueryParams,

    /// 原始问题
    pub original_query: String,

    /// 统计值（unknown 时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    /// 展示给用户的回答
    pub answer: String,

    /// 耗时（毫秒）
    pub took_ms: u64,
}

impl AskResponse {
    /// 有数值结果的回答
    pub fn answered(result: QueryResult, value: i64) -> Self {
        Self {
            intent: result.intent,
            params: result.params,
            original_query: result.original_query,
            value: Some(value),
            answer: format_count(value),
            took_ms: 0,
        }
    }

    /// 无法回答（附带提示）
    pub fn unanswered(result: QueryResult, hint: impl Into<String>) -> Self {
        Self {
            intent: result.intent,
            params: result.params,
            original_query: result.original_query,
            value: None,
            answer: hint.into(),
            took_ms: 0,
        }
    }

    pub fn with_took(mut self, took_ms: u64) -> Self {
        self.took_ms = took_ms;
        self
    }
}

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    pub message: String,

    /// 详细信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// 千分位格式: 1234567 -> "1,234,567"
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
