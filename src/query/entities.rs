// query/entities.rs - 实体抽取
//! 从问题中抽取创作者 ID 与播放量阈值
//!
//! 输入均为已小写的文本。

use once_cell::sync::Lazy;
use regex::Regex;

/// 创作者 ID 长度（十六进制字符）
pub const CREATOR_ID_LEN: usize = 32;

/// 播放量阈值下限，低于该值的数字不视为阈值（多半是日期或 ID 片段）
pub const VIEW_THRESHOLD_FLOOR: u64 = 1000;

/// "id" 之后常见的语法词，不可能是 ID
const NOT_AN_ID: &[&str] = &[
    "автора", "креатора", "автор", "креатор", "автором", "креатором", "у", "с",
];

// 正则表达式预编译
static ID_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bid\b\s*[:=]?\s*([^\s,.;:!?()]+)").unwrap()
});

static HEX_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9a-f]{32}\b").unwrap());

static ID_WITH_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bid\b\s*[:=]?\s*[0-9a-f]{32}\b|\b[0-9a-f]{32}\b").unwrap()
});

static ID_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-f]{32}\b|\bid\s+[a-z0-9]").unwrap()
});

static CREATOR_BEFORE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:креатор|автор)(?:а|ом|у)?\s+(?:с\s+)?(?:id\s+)?([0-9a-f]{32})\b").unwrap()
});

static ID_BEFORE_CREATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bid\s+([0-9a-f]{32})\s+(?:креатор|автор)").unwrap()
});

static DIGIT_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)[ \u{a0}](\d{3})\b").unwrap());

static THRESHOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:больше|более|свыше|превысил[а-я]*|набрал[а-я]*|>)\s*(?:чем\s+)?(\d+)").unwrap()
});

/// 32 位十六进制串
pub fn is_creator_id(token: &str) -> bool {
    token.len() == CREATOR_ID_LEN && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// 抽取创作者 ID
///
/// 优先取 "id" 后面的词；该词不是合法 ID 时，退而取文中任意独立的 32 位十六进制串。
pub fn extract_creator_id(text: &str) -> Option<String> {
    let after_id = ID_CANDIDATE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|token| !NOT_AN_ID.contains(token) && is_creator_id(token));

    after_id
        .or_else(|| HEX_TOKEN.find(text).map(|m| m.as_str()))
        .map(str::to_string)
}

/// 只在 "креатор/автор" 上下文中出现的 ID
///
/// 例如 "креатора id …"、"автора с id …"、"id … креатора"。
pub fn extract_creator_reference(text: &str) -> Option<String> {
    CREATOR_BEFORE_ID
        .captures(text)
        .or_else(|| ID_BEFORE_CREATOR.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 文中是否像是给出了 ID（十六进制串，或 "id " 后紧跟字母数字）
pub fn mentions_creator_id(text: &str) -> bool {
    ID_MENTION.is_match(text)
}

/// 删除 ID 及其前面的 "id"
pub fn strip_creator_id(text: &str) -> String {
    ID_WITH_TOKEN.replace_all(text, " ").into_owned()
}

/// 合并千分位空格: "10 000 000" -> "10000000"
pub fn join_digit_groups(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = DIGIT_GROUP.replace_all(&current, "${1}${2}").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 抽取播放量阈值
///
/// 先去掉 ID（其中的数字段会干扰），再取比较词后的第一个不小于下限的数字。
pub fn extract_view_threshold(text: &str) -> Option<u64> {
    let cleaned = join_digit_groups(&strip_creator_id(text));
    THRESHOLD
        .captures_iter(&cleaned)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .find(|&value| value >= VIEW_THRESHOLD_FLOOR)
}
