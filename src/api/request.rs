// api/request.rs - 问答请求类型
//! 定义问题请求的结构化类型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 问答请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    /// 原始问题文本
    pub text: String,

    /// 参考日期（"вчера"、"за неделю" 以此为准），缺省取当天
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

impl AskRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference_date: None,
        }
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json() {
        let request: AskRequest = serde_json::from_str(r#"{"text": "Прирост"}"#).unwrap();
        assert_eq!(request, AskRequest::new("Прирост"));

        let request: AskRequest =
            serde_json::from_str(r#"{"text": "Прирост", "reference_date": "2025-11-29"}"#).unwrap();
        assert_eq!(request.reference_date, NaiveDate::from_ymd_opt(2025, 11, 29));
    }
}
